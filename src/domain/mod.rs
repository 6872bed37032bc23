pub mod slug;
pub mod task;
pub mod user;

#[cfg(test)]
pub(crate) mod test_util;
