pub mod fake_portal;
