//! Full CU-CP shutdown scenarios
//!
//! Exercises `CuCpController::stop()` with live peer connections and an
//! in-flight UE release procedure: the stop must wait for the procedure,
//! drain both managers, run the core-network teardown exactly once and
//! leave the controller refusing new work.
