// Public library interface for sectormap.
// The binaries (sectormap, debug-layout) are thin drivers over these modules.

pub mod layout;
pub mod model;
pub mod render;
pub mod source;
