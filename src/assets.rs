pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod fetch;
pub(crate) mod handles;
pub(crate) mod source;
