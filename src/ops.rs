//! One-shot Boolean operations.
//!
//! Thin wrappers that build a clipper, add the operands and execute
//! once. Use [`Clipper64`] or [`ClipperD`] directly to combine the same
//! input several ways or to clip open paths.
use crate::{
    decimal::ClipperD,
    engine::{ClipType, Clipper64, FillRule},
    error::ClipperError,
    point::{Paths64, PathsD},
    polytree::PolyTree64,
};

/// Closed result of `clip_type` applied to `subjects` and `clips`.
pub fn boolean_op(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &Paths64,
    clips: &Paths64,
) -> Result<Paths64, ClipperError> {
    let mut clipper = Clipper64::new();
    clipper.add_subject(subjects)?;
    clipper.add_clip(clips)?;
    Ok(clipper.execute(clip_type, fill_rule)?.closed)
}

/// As [`boolean_op`], nesting the result into a tree.
pub fn boolean_op_tree(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &Paths64,
    clips: &Paths64,
) -> Result<PolyTree64, ClipperError> {
    let mut clipper = Clipper64::new();
    clipper.add_subject(subjects)?;
    clipper.add_clip(clips)?;
    let (tree, _) = clipper.execute_tree(clip_type, fill_rule)?;
    Ok(tree)
}

/// Decimal counterpart of [`boolean_op`], keeping `precision` decimal
/// places.
pub fn boolean_op_d(
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &PathsD,
    clips: &PathsD,
    precision: i32,
) -> Result<PathsD, ClipperError> {
    let mut clipper = ClipperD::new(precision)?;
    clipper.add_subject(subjects)?;
    clipper.add_clip(clips)?;
    Ok(clipper.execute(clip_type, fill_rule)?.closed)
}

/// Union of all `subjects`, which may overlap one another.
pub fn union(subjects: &Paths64, fill_rule: FillRule) -> Result<Paths64, ClipperError> {
    boolean_op(ClipType::Union, fill_rule, subjects, &Paths64::new())
}

pub fn intersect(subjects: &Paths64, clips: &Paths64, fill_rule: FillRule) -> Result<Paths64, ClipperError> {
    boolean_op(ClipType::Intersection, fill_rule, subjects, clips)
}

pub fn difference(subjects: &Paths64, clips: &Paths64, fill_rule: FillRule) -> Result<Paths64, ClipperError> {
    boolean_op(ClipType::Difference, fill_rule, subjects, clips)
}

pub fn xor(subjects: &Paths64, clips: &Paths64, fill_rule: FillRule) -> Result<Paths64, ClipperError> {
    boolean_op(ClipType::Xor, fill_rule, subjects, clips)
}

pub fn union_d(subjects: &PathsD, fill_rule: FillRule, precision: i32) -> Result<PathsD, ClipperError> {
    boolean_op_d(ClipType::Union, fill_rule, subjects, &PathsD::new(), precision)
}

pub fn intersect_d(
    subjects: &PathsD,
    clips: &PathsD,
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, ClipperError> {
    boolean_op_d(ClipType::Intersection, fill_rule, subjects, clips, precision)
}

pub fn difference_d(
    subjects: &PathsD,
    clips: &PathsD,
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, ClipperError> {
    boolean_op_d(ClipType::Difference, fill_rule, subjects, clips, precision)
}

pub fn xor_d(subjects: &PathsD, clips: &PathsD, fill_rule: FillRule, precision: i32) -> Result<PathsD, ClipperError> {
    boolean_op_d(ClipType::Xor, fill_rule, subjects, clips, precision)
}
