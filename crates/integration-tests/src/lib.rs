//! Integration tests for Yarnhaven.
//!
//! # Running Tests
//!
//! The tests in `tests/` drive the running binaries over HTTP and are
//! ignored by default:
//!
//! ```bash
//! # Start the session database and both binaries, then:
//! cargo test -p yarnhaven-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` - storefront base URL (default http://localhost:3000)
//! - `ADMIN_BASE_URL` - admin panel base URL (default http://localhost:3001)
//! - `TEST_PRODUCT_ID` - id of an in-stock product to exercise the cart with
//! - `TEST_USER_EMAIL` / `TEST_USER_PASSWORD` - a registered (non-admin) account
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` - an account with `is_admin`
//!
//! # Test Categories
//!
//! - `storefront_cart` - cart add/update/remove flows and badge count
//! - `checkout` - login, shipping, payment confirmation
//! - `admin_products` - admin gate and product CRUD
