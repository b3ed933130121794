//! Exposes the structs needed to configure a frame graph.

/// Default amount of resources a single graph can register.
pub const DEFAULT_MAX_RESOURCES: usize = 1024;

const_assert!(DEFAULT_MAX_RESOURCES > 0);

/// Settings used to create a [`FrameGraph`](crate::FrameGraph).
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Name of the graph. Only used for log output.
    pub name: String,
    /// Maximum amount of resources that can be registered in one graph. Registering more
    /// than this is an error, the handle space is never silently truncated.
    pub max_resources: usize,
    /// Run internal consistency checks on the island partition after every build.
    /// A failed check indicates a bug in the analyzer and panics.
    pub enable_validation: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            name: String::from("frame"),
            max_resources: DEFAULT_MAX_RESOURCES,
            enable_validation: cfg!(debug_assertions),
        }
    }
}

/// The settings builder is a convenience struct to easily create [`GraphSettings`].
///
/// For information about each of the fields, see [`GraphSettings`]
/// # Example
/// ```
/// # use framegraph::prelude::*;
/// let settings = SettingsBuilder::new()
///     .name("main view")
///     .max_resources(256)
///     .validation(true)
///     .build();
/// assert_eq!(settings.max_resources, 256);
/// ```
pub struct SettingsBuilder {
    inner: GraphSettings,
}

impl SettingsBuilder {
    /// Create a new settings builder with default settings.
    pub fn new() -> Self {
        SettingsBuilder {
            inner: GraphSettings::default(),
        }
    }

    /// Sets the graph name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    /// Sets the maximum amount of resources per graph.
    pub fn max_resources(mut self, count: usize) -> Self {
        self.inner.max_resources = count;
        self
    }

    /// Enable the island consistency checks.
    pub fn validation(mut self, val: bool) -> Self {
        self.inner.enable_validation = val;
        self
    }

    /// Build the resulting graph settings.
    pub fn build(self) -> GraphSettings {
        self.inner
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
