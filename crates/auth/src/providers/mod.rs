#[cfg(feature = "gotrue")]
mod gotrue;
mod memory;

#[cfg(feature = "gotrue")]
pub use gotrue::GoTrueProvider;
pub use memory::MemoryIdentityProvider;
