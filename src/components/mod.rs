pub mod force_graph;
pub mod navbar;
pub mod protected;
pub mod toast;
