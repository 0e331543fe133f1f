// End-to-end tests for the worker HTTP API
//
// Each test starts the worker on an ephemeral port next to a mock inference
// process (see helpers::mocks) and drives it over real HTTP. Timing-sensitive
// tests are marked #[serial].

mod test_delivery;
mod test_health;
mod test_runsync;
