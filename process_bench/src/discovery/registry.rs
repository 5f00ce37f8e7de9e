use std::collections::HashMap;

use crate::discovery::algorithm::MiningAlgorithm;
use crate::discovery::dfg_miner::{DfgMiner, DFG_MINER_NAME};
use crate::discovery::flower_miner::{FlowerMiner, FLOWER_MINER_NAME};

/// Factory producing a fresh handle of one algorithm
pub type AlgorithmFactory = Box<dyn Fn() -> Box<dyn MiningAlgorithm> + Send>;

///
/// Error encountered while resolving an algorithm from the [`AlgorithmRegistry`]
///
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// No algorithm is registered under the requested name
    UnknownAlgorithm(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::UnknownAlgorithm(name) => {
                write!(f, "Unknown algorithm: {}", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

///
/// Registry of discovery algorithms with cached, stateful handles
///
/// Algorithms are registered as factories; a handle is created on first
/// [`get`](AlgorithmRegistry::get) and reused for every subsequent run, so any
/// state an algorithm accumulates (tuned parameters, caches) carries over.
/// Handles are yielded one at a time through `&mut` access and are never
/// shared, so no two invocations of the same handle can overlap.
///
pub struct AlgorithmRegistry {
    order: Vec<String>,
    factories: HashMap<String, AlgorithmFactory>,
    handles: HashMap<String, Box<dyn MiningAlgorithm>>,
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.order)
            .field("instantiated", &self.handles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgorithmRegistry {
    /// Create a new empty [`AlgorithmRegistry`]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            factories: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    /// Create an [`AlgorithmRegistry`] with the built-in miners registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DFG_MINER_NAME, || Box::new(DfgMiner::new()));
        registry.register(FLOWER_MINER_NAME, || Box::new(FlowerMiner::new()));
        registry
    }

    /// Register an algorithm factory under the given name
    ///
    /// Re-registering a name replaces the factory and drops a previously
    /// cached handle.
    pub fn register<S, F>(&mut self, name: S, factory: F)
    where
        S: Into<String>,
        F: Fn() -> Box<dyn MiningAlgorithm> + Send + 'static,
    {
        let name = name.into();
        if !self.order.contains(&name) {
            self.order.push(name.clone());
        }
        self.handles.remove(&name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Names of all registered algorithms, in registration order
    pub fn available(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Resolve the cached handle for the given algorithm name
    ///
    /// The handle is created on first access and reused afterwards.
    pub fn get(&mut self, name: &str) -> Result<&mut (dyn MiningAlgorithm + '_), RegistryError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownAlgorithm(name.to_string()))?;
        let handle = self
            .handles
            .entry(name.to_string())
            .or_insert_with(|| factory());
        Ok(handle.as_mut())
    }
}
