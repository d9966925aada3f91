use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Color with each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    pub id: SquareId,
    pub color: Rgb,
    pub size: f32,
    /// Center of the square.
    pub position: Point,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Rgb {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(0.0..=1.0),
            g: rng.gen_range(0.0..=1.0),
            b: rng.gen_range(0.0..=1.0),
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), 0xff]
    }
}

impl Square {
    /// Top-left corner.
    pub fn origin(&self) -> Point {
        let half = self.size / 2.0;
        Point::new(self.position.x - half, self.position.y - half)
    }

    pub fn contains(&self, point: Point) -> bool {
        let half = self.size / 2.0;
        (point.x - self.position.x).abs() <= half && (point.y - self.position.y).abs() <= half
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_at(x: f32, y: f32) -> Square {
        Square {
            id: SquareId(0),
            color: Rgb {
                r: 0.0,
                g: 0.0,
                b: 0.0,
            },
            size: 50.0,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn contains_edges_and_center() {
        let square = square_at(100.0, 200.0);
        assert!(square.contains(Point::new(100.0, 200.0)));
        assert!(square.contains(Point::new(75.0, 175.0)));
        assert!(square.contains(Point::new(125.0, 225.0)));
        assert!(!square.contains(Point::new(74.0, 200.0)));
        assert!(!square.contains(Point::new(100.0, 226.0)));
    }

    #[test]
    fn origin_is_top_left() {
        assert_eq!(square_at(100.0, 200.0).origin(), Point::new(75.0, 175.0));
    }

    #[test]
    fn random_channels_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = Rgb::random(&mut rng);
            for v in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn rgba8_extremes() {
        let white = Rgb {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        };
        let black = Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        };
        assert_eq!(white.to_rgba8(), [0xff; 4]);
        assert_eq!(black.to_rgba8(), [0, 0, 0, 0xff]);
    }
}
