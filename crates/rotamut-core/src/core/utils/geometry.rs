use nalgebra::{Point3, Rotation3, Unit, Vector3};

const AXIS_EPSILON: f64 = 1e-10;

/// Dihedral angle in radians, in `(-π, π]`, of the four points `p0-p1-p2-p3`.
///
/// Positive when, looking down `p1 -> p2`, `p0` must be rotated clockwise to
/// eclipse `p3` (IUPAC convention).
pub fn dihedral(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x)
}

/// Rotation of `angle_radians` about `axis`, right-handed.
///
/// Returns `None` when the axis has (near) zero length.
pub fn rotation_about_axis(axis: &Vector3<f64>, angle_radians: f64) -> Option<Rotation3<f64>> {
    Unit::try_new(*axis, AXIS_EPSILON)
        .map(|unit_axis| Rotation3::from_axis_angle(&unit_axis, angle_radians))
}

/// Rotates `point` about a line through `origin` by translating to the
/// origin, rotating and translating back.
pub fn rotate_about(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    rotation: &Rotation3<f64>,
) -> Point3<f64> {
    origin + rotation * (point - origin)
}

/// Places a fourth atom from three reference atoms and internal coordinates.
///
/// `bond_length` is the `c-d` distance, `angle_degrees` the `b-c-d` angle and
/// `torsion_degrees` the `a-b-c-d` dihedral.
pub fn place_atom(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    bond_length: f64,
    angle_degrees: f64,
    torsion_degrees: f64,
) -> Point3<f64> {
    let angle = angle_degrees.to_radians();
    let torsion = torsion_degrees.to_radians();

    let bc = (c - b).normalize();
    let n = (b - a).cross(&bc).normalize();
    let m = n.cross(&bc);

    let d_local = Vector3::new(
        -bond_length * angle.cos(),
        bond_length * angle.sin() * torsion.cos(),
        bond_length * angle.sin() * torsion.sin(),
    );

    c + bc * d_local.x + m * d_local.y + n * d_local.z
}

/// Bond angle `a-b-c` in degrees.
pub fn bond_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    (a - b).angle(&(c - b)).to_degrees()
}
