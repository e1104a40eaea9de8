use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const fn from_u32(hex: u32) -> Self {
        Rgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Packed `0xRRGGBB`, the layout of a minifb-style pixel buffer.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Evenly spaced colour stops on `[0, 1]`, linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: Vec<Rgb>,
}

const DIGITS: [u32; 9] = [
    0x000000, // black
    0xa52a2a, // brown
    0x800080, // purple
    0x0000ff, // blue
    0x008000, // green
    0xffff00, // yellow
    0xffa500, // orange
    0xff0000, // red
    0xffc0cb, // pink
];

impl Gradient {
    /// Returns `None` with fewer than two stops.
    pub fn new(stops: Vec<Rgb>) -> Option<Self> {
        (stops.len() >= 2).then_some(Gradient { stops })
    }

    /// Short representations dark, long ones warm.
    pub fn digits() -> Self {
        Gradient { stops: DIGITS.iter().map(|&hex| Rgb::from_u32(hex)).collect() }
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.stops.len() - 1;
        let pos = t * segments as f64;
        let i = (pos.floor() as usize).min(segments - 1);
        let frac = pos - i as f64;

        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient::digits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        let g = Gradient::digits();
        assert_eq!(g.sample(0.0), Rgb::new(0, 0, 0));
        assert_eq!(g.sample(1.0), Rgb::from_u32(0xffc0cb));
        assert_eq!(g.sample(-3.0), g.sample(0.0));
        assert_eq!(g.sample(7.0), g.sample(1.0));
        assert_eq!(g.sample(f64::NAN), g.sample(0.0));
    }

    #[test]
    fn stops_are_evenly_spaced() {
        let g = Gradient::digits();
        assert_eq!(g.sample(3.0 / 8.0), Rgb::new(0, 0, 255));
        assert_eq!(g.sample(0.5), Rgb::new(0, 128, 0));
    }

    #[test]
    fn interpolates_between_stops() {
        let g = Gradient::new(vec![Rgb::new(0, 0, 0), Rgb::new(200, 100, 50)]).unwrap();
        assert_eq!(g.sample(0.5), Rgb::new(100, 50, 25));
        assert_eq!(g.sample(0.25).to_u32(), 0x32190d);
    }

    #[test]
    fn needs_two_stops() {
        assert!(Gradient::new(vec![Rgb::new(1, 2, 3)]).is_none());
    }
}
