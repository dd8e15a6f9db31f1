//! Small vector/quaternion helpers over plain `f32` arrays.
//!
//! Quaternions are stored `[x, y, z, w]`. Attachment transforms arrive as
//! row-major 3x4 matrices (three rows of `[r0 r1 r2 t]`).

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];
pub type Quat = [f32; 4];

pub const QUAT_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

/// Hamilton product `a * b`.
pub fn quat_mul(a: Quat, b: Quat) -> Quat {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Rotate `v` by the unit quaternion `q`.
pub fn quat_rotate(q: Quat, v: Vec3) -> Vec3 {
    let p = [v[0], v[1], v[2], 0.0];
    let conj = [-q[0], -q[1], -q[2], q[3]];
    let r = quat_mul(quat_mul(q, p), conj);
    [r[0], r[1], r[2]]
}

pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Convert a proper rotation matrix (row-major 3x3) to a quaternion.
///
/// Branches on the largest diagonal element so 180-degree rotations do not
/// divide by a vanishing trace term.
pub fn rotation_matrix_to_quat(m: &[[f32; 3]; 3]) -> Quat {
    let trace = m[0][0] + m[1][1] + m[2][2];
    if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        [
            (m[2][1] - m[1][2]) / s,
            (m[0][2] - m[2][0]) / s,
            (m[1][0] - m[0][1]) / s,
            0.25 * s,
        ]
    } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
        let s = (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 2.0;
        [
            0.25 * s,
            (m[0][1] + m[1][0]) / s,
            (m[0][2] + m[2][0]) / s,
            (m[2][1] - m[1][2]) / s,
        ]
    } else if m[1][1] > m[2][2] {
        let s = (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt() * 2.0;
        [
            (m[0][1] + m[1][0]) / s,
            0.25 * s,
            (m[1][2] + m[2][1]) / s,
            (m[0][2] - m[2][0]) / s,
        ]
    } else {
        let s = (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt() * 2.0;
        [
            (m[0][2] + m[2][0]) / s,
            (m[1][2] + m[2][1]) / s,
            0.25 * s,
            (m[1][0] - m[0][1]) / s,
        ]
    }
}

/// Decompose a row-major 3x4 transform into (rotation, translation, scale).
///
/// Scale is taken from the column norms of the 3x3 part; zero-scale columns
/// are left unnormalized instead of dividing by zero.
pub fn decompose_matrix(mat: &[f32; 12]) -> (Quat, Vec3, Vec3) {
    let row = |r: usize| [mat[r * 4], mat[r * 4 + 1], mat[r * 4 + 2]];
    let m = [row(0), row(1), row(2)];
    let translation = [mat[3], mat[7], mat[11]];

    let mut scale = [0.0f32; 3];
    for c in 0..3 {
        scale[c] = (m[0][c] * m[0][c] + m[1][c] * m[1][c] + m[2][c] * m[2][c]).sqrt();
    }

    let mut rot = m;
    for c in 0..3 {
        if scale[c] != 0.0 {
            for r in 0..3 {
                rot[r][c] /= scale[c];
            }
        }
    }

    (rotation_matrix_to_quat(&rot), translation, scale)
}

/// Convert a quaternion to euler angles, returned as `[yaw, pitch, roll]`
/// (ZYX order) in radians.
pub fn quat_to_euler(q: Quat) -> Vec3 {
    let [x, y, z, w] = q;

    let t0 = 2.0 * (w * x + y * z);
    let t1 = 1.0 - 2.0 * (x * x + y * y);
    let roll = t0.atan2(t1);

    let t2 = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0);
    let pitch = t2.asin();

    let t3 = 2.0 * (w * z + x * y);
    let t4 = 1.0 - 2.0 * (y * y + z * z);
    let yaw = t3.atan2(t4);

    [yaw, pitch, roll]
}
