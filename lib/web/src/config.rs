use registry::Registry;

/// Holds the configuration for a registry web server.
pub struct ServerConfig {
    /// The registry that answers the searches.
    pub registry: Registry,
    /// The IP address or DNS name that the socket binds to.
    pub bind: String,
    /// Whether CORS is enabled.
    pub cors: bool,
}
