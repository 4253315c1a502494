// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod calltime;
pub mod convert;
pub mod descriptor;
pub mod display;
pub mod filter;
pub mod forms;
pub mod ids;
pub mod listview;
pub mod model;
pub mod pagination;
pub mod state;

pub use calltime::*;
pub use convert::*;
pub use descriptor::*;
pub use display::*;
pub use filter::*;
pub use forms::*;
pub use ids::*;
pub use listview::*;
pub use model::*;
pub use pagination::*;
pub use state::*;
