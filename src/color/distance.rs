use super::Color;

/// Euclidean distance between two colors in RGB space.
///
/// Ranges from `0.0` (identical) to about `441.67` (black vs. white).
pub fn distance(a: Color, b: Color) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt()
}
