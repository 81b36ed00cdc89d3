pub(crate) mod cpu;
pub(crate) mod surface;

/// Resampling budget for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderQuality {
    /// Half-resolution draw with the cheapest image filter; used while a gesture is in flight.
    Low,
    /// Full-resolution draw with the best image filter; used after settle and for export.
    High,
}
