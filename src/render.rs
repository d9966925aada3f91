use crate::game::GameState;

pub const BACKGROUND: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

#[derive(Debug, PartialEq)]
pub enum Primitive {
    Clear([u8; 4]),
    Rect {
        x: i32,
        y: i32,
        size: u32,
        color: [u8; 4],
    },
}

/// RGBA framebuffer view.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

/// Draw list for the current state. Squares only show during a round;
/// later squares land on top.
pub fn scene(state: &GameState) -> Vec<Primitive> {
    let mut queue = vec![Primitive::Clear(BACKGROUND)];

    if state.active {
        queue.extend(state.squares.iter().map(|square| {
            let origin = square.origin();
            Primitive::Rect {
                x: origin.x.round() as i32,
                y: origin.y.round() as i32,
                size: square.size.round() as u32,
                color: square.color.to_rgba8(),
            }
        }));
    }

    queue
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        assert_eq!(frame.len(), (width * height * 4) as usize);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn draw(&mut self, cmd: &Primitive) {
        match *cmd {
            Primitive::Clear(color) => {
                for pixel in self.frame.chunks_exact_mut(4) {
                    pixel.copy_from_slice(&color);
                }
            }
            Primitive::Rect { x, y, size, color } => self.fill_rect(x, y, size, color),
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, size: u32, color: [u8; 4]) {
        let clip = |lo: i32, max: u32| -> (usize, usize) {
            let start = lo.clamp(0, max as i32) as usize;
            let end = (lo as i64 + size as i64).clamp(0, max as i64) as usize;
            (start, end)
        };
        let (x0, x1) = clip(x, self.width);
        let (y0, y1) = clip(y, self.height);

        for row in y0..y1 {
            let offset = row * self.width as usize;
            let line = &mut self.frame[(offset + x0) * 4..(offset + x1) * 4];
            for pixel in line.chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }
}
