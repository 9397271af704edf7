pub mod curve;

pub use curve::{
    ArcLengthTable, BezierCurve, BezierCurve2D, BezierCurve3D, Curve2D, Curve3D, CurvePoint2D,
    CurvePoint3D, CurveUnion2D, CurveUnion3D, NormalizedCurve2D, NormalizedCurve3D,
    RationalBezierCurve, RationalBezierCurve2D, RationalBezierCurve3D,
};
