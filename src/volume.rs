use ndarray::Array3;

/// 4x4 voxel-to-world transform, row major.
pub type Affine = [[f32; 4]; 4];

/// Identity transform. Spatial geometry is not reconstructed from
/// per-slice position metadata; consumers must not assume physically
/// accurate spacing or orientation.
pub const IDENTITY_AFFINE: Affine = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A reconstructed 3D acquisition.
///
/// `data` is shaped (rows, cols, depth): each slice keeps its in-plane
/// layout and consecutive slices stack along the third axis. depth is
/// always at least 1; empty series never produce a volume.
#[derive(Debug)]
pub struct Volume {
    pub subject_id: String,
    pub series_id: String,
    pub data: Array3<u16>,
    pub affine: Affine,
}

impl Volume {
    /// Get the dimensions of the volume (rows, cols, depth)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of slices stacked into this volume.
    pub fn depth(&self) -> usize {
        self.data.dim().2
    }
}
