/// All panic messages used by the allocation_certificate contract.
///
/// Using string constants avoids typos in `#[should_panic(expected = "...")]` tests.
pub const ERR_ALREADY_INITIALIZED: &str = "already initialized";
pub const ERR_NOT_INITIALIZED: &str = "not initialized";
pub const ERR_UNAUTHORIZED: &str = "unauthorized";
pub const ERR_OPERATOR_NOT_SET: &str = "operator not set";
pub const ERR_NO_CERTIFICATE: &str = "certificate does not exist";
pub const ERR_NOT_CERTIFICATE_OWNER: &str = "caller does not own this certificate";
pub const ERR_ID_OVERFLOW: &str = "certificate id counter would overflow";
