//=========================================================================
// Animations
//=========================================================================
//
// Keyframe stylesheets consumed by the renderer.
//
// The bounce used when tiles drop onto the board depends on the tile
// size, so it is regenerated whenever the window is resized.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Write;

//=== Constants ===========================================================

/// Keyframe step of the generated bounce, in percent.
const BOUNCE_STEP: u32 = 5;

//=== Global Keyframes ====================================================

/// Keyframes shared by every scene.
pub fn global_keyframes() -> &'static str {
    concat!(
        "@keyframes fade-in { 0% { opacity: 0 } 100% { opacity: 1 } }\n",
        "@keyframes fade-out { 0% { opacity: 1 } 100% { opacity: 0 } }\n",
        "@keyframes menu-fade-out { 0% { opacity: 1 } 100% { opacity: 0; visibility: hidden } }\n",
        "@keyframes pulse { 0% { transform: scale(1) } 50% { transform: scale(1.1) } 100% { transform: scale(1) } }\n",
    )
}

//=== Bounce ==============================================================

/// Standard ease-out bounce on `t` in `[0, 1]`.
fn ease_out_bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Vertical offsets of a tile falling `distance` pixels and bouncing to
/// rest, as `(percent, offset)` pairs from `-distance` up to `0`.
pub fn bounce_offsets(distance: f64) -> Vec<(u32, f64)> {
    (0..=100)
        .step_by(BOUNCE_STEP as usize)
        .map(|percent| {
            let t = f64::from(percent) / 100.0;
            (percent, -distance * (1.0 - ease_out_bounce(t)))
        })
        .collect()
}

/// Stylesheet for the tile bounce at the given tile size.
pub fn bounce_keyframes(tile_size: f64) -> String {
    let mut css = String::from("@keyframes bounce-down {\n");
    for (percent, offset) in bounce_offsets(tile_size) {
        // Writing into a String cannot fail.
        let _ = writeln!(css, "  {percent}% {{ transform: translate(0px, {offset:.2}px) }}");
    }
    css.push('}');
    css
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounce_starts_one_tile_up_and_lands() {
        let offsets = bounce_offsets(55.0);

        assert_eq!(offsets.first().map(|&(p, _)| p), Some(0));
        assert_eq!(offsets.last().map(|&(p, _)| p), Some(100));
        assert!((offsets[0].1 + 55.0).abs() < 1e-9);
        assert!(offsets.last().is_some_and(|&(_, o)| o.abs() < 1e-9));
        assert!(offsets.iter().all(|&(_, o)| (-55.0..=1e-9).contains(&o)));
    }

    #[test]
    fn stylesheet_lists_every_step() {
        let css = bounce_keyframes(44.0);
        assert!(css.starts_with("@keyframes bounce-down {"));
        assert!(css.contains("0% { transform: translate(0px, -44.00px) }"));
        assert_eq!(css.matches("transform").count(), 21);
    }
}
