use super::Frame;
use crate::foundation::math::polar;
use crate::shapes::Shapes;

const MAX_RINGS_PER_SLOT: usize = 4096;

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let c = f.center();
    let ch = cfg.cube_height;
    if ch.is_nan() || ch <= 0.0 {
        return;
    }
    let slice = 360.0 / cfg.count as f64;
    // Rings starting past the canvas diagonal are never visible.
    let diag = f.canvas.width_f64().hypot(f.canvas.height_f64());
    let in_view = ((diag - cfg.diameter - cfg.gap) / ch).floor() + 1.0;

    for i in 0..cfg.count {
        let v = f.value(i);
        let a1 = slice * i as f64 + cfg.rotate + cfg.gap / 4.0;
        let a2 = slice * (i + 1) as f64 + cfg.rotate;
        let rings = (v / ch).ceil().min(in_view).clamp(0.0, MAX_RINGS_PER_SLOT as f64) as usize;
        for j in 0..rings {
            let d1 = cfg.diameter + ch * j as f64 + cfg.gap;
            let d2 = cfg.diameter + ch * (j + 1) as f64;
            let segment = vec![
                polar(c, d1, a1),
                polar(c, d2, a1),
                polar(c, d2, a2),
                polar(c, d1, a2),
            ];
            shapes.polygon(segment, f.style);
        }
    }
}
