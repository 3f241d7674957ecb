//! Property tests for the page engine.

mod pagination_props;
