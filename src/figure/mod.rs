mod figure;
mod layout;
mod trace;

pub use figure::Figure;
pub use layout::{Annotation, AspectMode, Axis, Camera, Layout, Scene, Shape, ShapeType, Vec3};
pub use trace::{AxisValue, Line, Marker, MarkerColor, Trace, TraceMode};
