//! Boolean operations on [`geo`] polygons.
//!
//! Rings are fed to a [`ClipperD`] with the even-odd rule, so input
//! orientation does not matter. The result is read back from the
//! nested tree: rings at odd depth become polygon exteriors, their
//! children the interiors.
use geo::{Coordinate, LineString, MultiPolygon, Polygon};

use crate::{
    decimal::ClipperD,
    engine::{ClipType, FillRule},
    error::ClipperError,
    point::{PathD, PathsD, PointD},
    polytree::{PolyPath, PolyTreeD},
};

/// Decimal places kept when clipping `geo` geometries.
pub const GEO_PRECISION: i32 = 8;

/// Geometries usable as operands of a Boolean operation.
pub trait BooleanOp {
    /// The rings of the geometry, without closing points.
    fn rings(&self) -> PathsD;

    fn boolean_op<G: BooleanOp>(&self, other: &G, op: ClipType) -> Result<MultiPolygon<f64>, ClipperError> {
        let mut clipper = ClipperD::new(GEO_PRECISION)?;
        clipper.add_subject(&self.rings())?;
        clipper.add_clip(&other.rings())?;
        let (tree, _) = clipper.execute_tree(op, FillRule::EvenOdd)?;
        Ok(tree_to_multi_polygon(&tree))
    }

    fn intersection<G: BooleanOp>(&self, other: &G) -> Result<MultiPolygon<f64>, ClipperError> {
        self.boolean_op(other, ClipType::Intersection)
    }

    fn union<G: BooleanOp>(&self, other: &G) -> Result<MultiPolygon<f64>, ClipperError> {
        self.boolean_op(other, ClipType::Union)
    }

    fn difference<G: BooleanOp>(&self, other: &G) -> Result<MultiPolygon<f64>, ClipperError> {
        self.boolean_op(other, ClipType::Difference)
    }

    fn xor<G: BooleanOp>(&self, other: &G) -> Result<MultiPolygon<f64>, ClipperError> {
        self.boolean_op(other, ClipType::Xor)
    }
}

impl BooleanOp for Polygon<f64> {
    fn rings(&self) -> PathsD {
        std::iter::once(self.exterior())
            .chain(self.interiors())
            .map(ring_to_path)
            .collect()
    }
}

impl BooleanOp for MultiPolygon<f64> {
    fn rings(&self) -> PathsD {
        self.0.iter().flat_map(|p| p.rings()).collect()
    }
}

fn ring_to_path(ring: &LineString<f64>) -> PathD {
    let mut coords = &ring.0[..];
    if ring.is_closed() && coords.len() > 1 {
        coords = &coords[..coords.len() - 1];
    }
    coords.iter().map(|c| PointD::new(c.x, c.y)).collect()
}

fn path_to_ring(path: &[PointD]) -> LineString<f64> {
    path.iter()
        .map(|pt| Coordinate { x: pt.x, y: pt.y })
        .collect::<Vec<_>>()
        .into()
}

/// Convert a tree into polygons; islands inside holes start new
/// polygons.
pub fn tree_to_multi_polygon(tree: &PolyTreeD) -> MultiPolygon<f64> {
    let mut polygons = Vec::new();
    let mut outers: Vec<PolyPath<'_, PointD>> = tree.root().children().collect();
    while let Some(outer) = outers.pop() {
        let mut interiors = Vec::with_capacity(outer.child_count());
        for hole in outer.children() {
            interiors.push(path_to_ring(hole.polygon()));
            outers.extend(hole.children());
        }
        polygons.push(Polygon::new(path_to_ring(outer.polygon()), interiors));
    }
    MultiPolygon(polygons)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use approx::assert_relative_eq;
    use geo::area::Area;
    use log::info;
    use wkt::{ToWkt, TryFromWkt};

    use super::*;
    use crate::engine::tests::init_log;

    fn check_op(wkt1: &str, wkt2: &str, op: ClipType, expected_area: f64) -> Result<MultiPolygon<f64>, Box<dyn Error>> {
        init_log();
        let poly1 = MultiPolygon::<f64>::try_from_wkt_str(wkt1)?;
        let poly2 = MultiPolygon::<f64>::try_from_wkt_str(wkt2)?;
        let result = poly1.boolean_op(&poly2, op)?;
        info!("{op:?}: {wkt}", wkt = result.to_wkt());
        assert_relative_eq!(result.unsigned_area(), expected_area, epsilon = 1e-6);
        Ok(result)
    }

    #[test]
    fn test_rect_overlapping() -> Result<(), Box<dyn Error>> {
        let wkt1 = "MULTIPOLYGON(((0 0,1 0,1 1,0 1,0 0)))";
        let wkt2 = "MULTIPOLYGON(((0.5 0.5,2 0.5,2 2,0.5 2,0.5 0.5)))";
        check_op(wkt1, wkt2, ClipType::Union, 1. + 2.25 - 0.25)?;
        check_op(wkt1, wkt2, ClipType::Intersection, 0.25)?;
        check_op(wkt1, wkt2, ClipType::Difference, 0.75)?;
        let xor = check_op(wkt1, wkt2, ClipType::Xor, 3.)?;
        assert!(!xor.0.is_empty());
        Ok(())
    }

    #[test]
    fn test_ext_in_hole() -> Result<(), Box<dyn Error>> {
        // The union has a ring inside a hole inside an exterior.
        let wkt1 = "MULTIPOLYGON(((0 0,40 0,40 40,0 40,0 0),(10 10,30 10,30 30,10 30,10 10)))";
        let wkt2 = "MULTIPOLYGON(((11 11,29 11,29 29,11 29,11 11),(15 15,25 15,25 25,15 25,15 15)))";
        let result = check_op(wkt1, wkt2, ClipType::Union, 1600. - 400. + 324. - 100.)?;
        assert_eq!(result.0.len(), 2);
        assert!(result.0.iter().all(|p| p.interiors().len() == 1));
        Ok(())
    }

    #[test]
    fn test_polygon_operands() -> Result<(), Box<dyn Error>> {
        init_log();
        // Clockwise exterior; orientation is irrelevant under even-odd.
        let poly1 = Polygon::<f64>::try_from_wkt_str("POLYGON((0 0,0 2,2 2,2 0,0 0))")?;
        let poly2 = Polygon::<f64>::try_from_wkt_str("POLYGON((1 1,3 1,3 3,1 3,1 1))")?;
        assert_relative_eq!(poly1.intersection(&poly2)?.unsigned_area(), 1., epsilon = 1e-6);
        assert_relative_eq!(poly1.union(&poly2)?.unsigned_area(), 7., epsilon = 1e-6);
        assert_relative_eq!(poly1.difference(&poly2)?.unsigned_area(), 3., epsilon = 1e-6);
        assert_relative_eq!(poly1.xor(&poly2)?.unsigned_area(), 6., epsilon = 1e-6);

        let disjoint = Polygon::<f64>::try_from_wkt_str("POLYGON((5 5,6 5,6 6,5 6,5 5))")?;
        assert!(poly1.intersection(&disjoint)?.0.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_operand() -> Result<(), Box<dyn Error>> {
        init_log();
        let poly = MultiPolygon::<f64>::try_from_wkt_str("MULTIPOLYGON(((0 0,2 2,2 0,0 0)))")?;
        let empty = MultiPolygon::<f64>(vec![]);
        assert_relative_eq!(poly.union(&empty)?.unsigned_area(), 2., epsilon = 1e-6);
        assert!(poly.intersection(&empty)?.0.is_empty());
        assert!(empty.union(&empty)?.0.is_empty());
        Ok(())
    }
}
