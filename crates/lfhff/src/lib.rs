//! lfhff library crate
//!
//! Host-name lookup over hosts files, with binary search for files that
//! declare themselves sorted via the `#LFHFFv1` first line.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut hosts = BufReader::new(File::open("/etc/hosts")?);
//! match lfhff::lookup(&mut hosts, "localhost")? {
//!     lfhff::LookupResult::Found(found) => println!("{}", found.address),
//!     lfhff::LookupResult::NotFound => println!("not found"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod tracing_setup;
pub mod verify;

#[cfg(test)]
pub mod test_utils;

pub use config::{ConfigError, LookupConfig};
pub use error::LookupError;
pub use lookup::{
    detect_mode, lookup, HostMatch, HostsSource, LookupOptions, LookupResult, SearchMode,
    SortedHostsLookup,
};
pub use verify::{verify, VerifyOptions, VerifyReport};
