//! Synthetic diagram drawing for the integration tests.

#![allow(dead_code)]

pub const BACKGROUND: u8 = 200;
pub const INK: u8 = 0;
pub const PAPER: u8 = 255;

/// Interleaved RGB canvas with a mid-gray background.
#[derive(Debug)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![BACKGROUND; width * height * 3],
        }
    }

    pub fn set(&mut self, x: i64, y: i64, level: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 3;
        self.data[i..i + 3].fill(level);
    }

    pub fn disk(&mut self, cx: i64, cy: i64, r: i64, level: u8) {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                if (x - cx).pow(2) + (y - cy).pow(2) <= r * r {
                    self.set(x, y, level);
                }
            }
        }
    }

    pub fn rect(&mut self, x0: i64, x1: i64, y0: i64, y1: i64, level: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, level);
            }
        }
    }

    /// Outlined node: ink ring around a paper interior.
    pub fn node(&mut self, cx: i64, cy: i64, outer: i64, inner: i64) {
        self.disk(cx, cy, outer, INK);
        self.disk(cx, cy, inner, PAPER);
    }

    /// Horizontal double-line connector: ink bar of rows `y0..y1` with two
    /// paper strips running along it.
    pub fn connector(&mut self, x0: i64, x1: i64, y0: i64, y1: i64) {
        self.rect(x0, x1, y0, y1, INK);
        self.rect(x0 + 2, x1 - 2, y0 + 2, y0 + 5, PAPER);
        self.rect(x0 + 2, x1 - 2, y1 - 4, y1 - 1, PAPER);
    }

    pub fn raster(&self) -> sg_graph::Raster<'_> {
        sg_graph::Raster::new(self.width, self.height, 3, &self.data)
    }
}

/// Two outlined nodes of radius 20 joined by one connector.
pub fn simple_connector() -> Canvas {
    let mut canvas = Canvas::new(200, 100);
    canvas.node(50, 50, 20, 16);
    canvas.node(150, 50, 20, 16);
    canvas.connector(66, 134, 43, 57);
    canvas
}

/// One solid ink disk of radius 30 and nothing else.
pub fn isolated_node() -> Canvas {
    let mut canvas = Canvas::new(200, 200);
    canvas.disk(100, 100, 30, INK);
    canvas
}

/// Two nodes joined by a long connector whose middle ink band carries two
/// single paper dots, far from the connector center.
pub fn marked_connector() -> Canvas {
    let mut canvas = Canvas::new(300, 100);
    canvas.node(50, 50, 20, 16);
    canvas.node(250, 50, 20, 16);
    canvas.connector(66, 234, 43, 57);
    canvas.set(100, 50, PAPER);
    canvas.set(200, 50, PAPER);
    canvas
}
