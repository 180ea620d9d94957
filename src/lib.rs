pub use {
    self::{batch::*, scenario::*, search::*, util::*},
    clap::Parser,
};

mod batch;
mod scenario;
mod search;
mod util;
