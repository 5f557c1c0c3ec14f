//! End-to-end tests at the store level.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! (seeded where random) to verify behavior through the public store API.

#![cfg(test)]

mod helpers;

mod test_custom_sentinels;
mod test_default_graph;
mod test_get_by_predicate;
mod test_index_consistency;
mod test_join_brute_force;
mod test_plan_errors;
mod test_range_brute_force;
mod test_search_short_circuit;
