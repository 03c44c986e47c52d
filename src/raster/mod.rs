pub(crate) mod alpha;
pub(crate) mod bitmap;
pub(crate) mod blend;
pub(crate) mod buffer;
pub(crate) mod image;
