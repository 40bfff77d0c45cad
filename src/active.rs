use crate::point::Point64;

/// Marks two adjacent hot edges whose rings were joined along a shared
/// collinear seam and must be split apart again when they diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinWith {
    None,
    Left,
    Right,
}

/// An edge currently crossing the sweep line.
///
/// An active edge walks one bound of an input ring, from a local minimum
/// up to the matching local maximum, advancing `bot`/`top` one vertex at
/// a time. All links are keys into the sweep's edge slab.
#[derive(Debug, Clone)]
pub(crate) struct Active {
    pub(crate) bot: Point64,
    pub(crate) top: Point64,
    /// `x` of the edge at the current scanline.
    pub(crate) curr_x: i64,
    /// Inverse slope; `±inf` for horizontals (see [`get_dx`]).
    pub(crate) dx: f64,
    /// `+1` when walking the ring forwards, `-1` backwards.
    pub(crate) wind_dx: i32,
    pub(crate) wind_cnt: i32,
    pub(crate) wind_cnt2: i32,
    pub(crate) outrec: Option<usize>,
    pub(crate) prev_in_ael: Option<usize>,
    pub(crate) next_in_ael: Option<usize>,
    pub(crate) prev_in_sel: Option<usize>,
    pub(crate) next_in_sel: Option<usize>,
    pub(crate) jump: Option<usize>,
    pub(crate) vertex_top: usize,
    pub(crate) local_min: usize,
    pub(crate) is_left_bound: bool,
    pub(crate) join_with: JoinWith,
}

impl Active {
    pub(crate) fn new(bot: Point64, top: Point64, wind_dx: i32, vertex_top: usize, local_min: usize) -> Self {
        Active {
            bot,
            top,
            curr_x: bot.x,
            dx: get_dx(bot, top),
            wind_dx,
            wind_cnt: 0,
            wind_cnt2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            prev_in_sel: None,
            next_in_sel: None,
            jump: None,
            vertex_top,
            local_min,
            is_left_bound: false,
            join_with: JoinWith::None,
        }
    }

    #[inline]
    pub(crate) fn set_dx(&mut self) {
        self.dx = get_dx(self.bot, self.top);
    }

    #[inline]
    pub(crate) fn is_horizontal(&self) -> bool {
        self.top.y == self.bot.y
    }

    #[inline]
    pub(crate) fn is_heading_right_horz(&self) -> bool {
        self.dx == f64::NEG_INFINITY
    }

    #[inline]
    pub(crate) fn is_heading_left_horz(&self) -> bool {
        self.dx == f64::INFINITY
    }

    #[inline]
    pub(crate) fn is_hot(&self) -> bool {
        self.outrec.is_some()
    }

    #[inline]
    pub(crate) fn is_joined(&self) -> bool {
        self.join_with != JoinWith::None
    }

    /// `x` of the edge at scanline `y`, rounded to the nearest integer.
    pub(crate) fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y || self.top.x == self.bot.x {
            self.top.x
        } else if y == self.bot.y {
            self.bot.x
        } else {
            self.bot.x + (self.dx * (y - self.bot.y) as f64).round() as i64
        }
    }
}

/// Inverse slope `dx/dy` of the segment; horizontals map to `-inf` when
/// heading right and `+inf` when heading left.
#[inline]
pub(crate) fn get_dx(pt1: Point64, pt2: Point64) -> f64 {
    let dy = (pt2.y - pt1.y) as f64;
    if dy != 0. {
        (pt2.x - pt1.x) as f64 / dy
    } else if pt2.x > pt1.x {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}
