#[inline]
pub(crate) fn _default_region() -> String {
    "eu-west-3".to_owned()
}

pub(crate) const fn _default_max_attempts() -> u32 {
    10
}
