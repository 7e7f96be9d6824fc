mod fake_transport;
mod response_tests;
