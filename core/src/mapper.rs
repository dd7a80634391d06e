use crate::writer::MappingWriter;
use crate::{
    GeneratorConfig, IoSink, JsonGenerator, MapperConfig, MappingSource, Mappings, Result,
    TextGenerator, ToValue, Value,
};
use std::sync::Arc;

/// Writes object graphs as JSON, according to a [`MapperConfig`] and a source of class mappings.
///
/// A [`Mapper`] is immutable once built and can be shared between threads; every write has its
/// own deduplication state.
#[derive(Clone)]
pub struct Mapper {
    config: Arc<MapperConfig>,
    mappings: Arc<dyn MappingSource>,
    output: GeneratorConfig,
}

impl Mapper {
    /// Constructs a [`Mapper`] with the given configuration and class mappings.
    pub fn new(config: MapperConfig, mappings: impl MappingSource + 'static) -> Self {
        Self {
            config: Arc::new(config),
            mappings: Arc::new(mappings),
            output: GeneratorConfig::default(),
        }
    }

    /// Sets the formatting used by [`Mapper::to_string`] and [`Mapper::to_writer`].
    pub fn with_output(mut self, output: GeneratorConfig) -> Self {
        self.output = output;
        self
    }

    /// The configuration of this mapper.
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Writes `value` as a single JSON document to the given generator.
    pub fn write(&self, value: &Value, generator: &mut dyn JsonGenerator) -> Result<()> {
        let deduplicate = self.deduplicate(value);
        tracing::debug!(kind = ?value.kind(), deduplicate, "writing value");
        let mut writer = MappingWriter::new(&self.config, &*self.mappings, generator, deduplicate);
        writer.write_root(value)
    }

    /// Writes `value` as a JSON string.
    pub fn to_string(&self, value: &Value) -> Result<String> {
        let mut generator = TextGenerator::new(self.output, String::new());
        self.write(value, &mut generator)?;
        generator.finish()
    }

    /// Writes `value` as UTF-8 encoded JSON to the given destination.
    pub fn to_writer<W: std::io::Write>(&self, dest: W, value: &Value) -> Result<W> {
        let mut generator = TextGenerator::new(self.output, IoSink::new(dest));
        self.write(value, &mut generator)?;
        Ok(generator.finish()?.into_inner())
    }

    /// Converts `value` to a [`Value`] and writes it as a JSON string.
    pub fn to_string_of<T: ToValue + ?Sized>(&self, value: &T) -> Result<String> {
        self.to_string(&value.to_value())
    }

    /// Determines whether a write rooted at `value` deduplicates objects. The class mapping of the
    /// root type can override the configured setting.
    fn deduplicate(&self, value: &Value) -> bool {
        value
            .as_object()
            .and_then(|object| self.mappings.find_or_create(object.type_key()))
            .and_then(|mapping| mapping.deduplicate_objects)
            .unwrap_or(self.config.deduplicate_objects)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(MapperConfig::default(), Mappings::new())
    }
}
