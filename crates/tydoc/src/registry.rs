//! Symbol identity to reference record mapping.

use rustc_hash::FxHashMap;

use crate::model::{RefId, RefSpec, RefTarget};

/// Hands out one [`RefSpec`] per symbol identity for the duration of a run.
///
/// Symbols are partitioned by name and compared with `PartialEq` inside a
/// partition, so hosts whose symbols are not hashable still get identity
/// semantics. Two symbols with the same name from different scopes get
/// distinct records.
#[derive(Debug)]
pub struct SymbolRegistry<S> {
    by_name: FxHashMap<String, Vec<(S, RefId)>>,
    refs: Vec<RefSpec>,
}

impl<S: PartialEq> SymbolRegistry<S> {
    pub fn new() -> Self {
        Self {
            by_name: FxHashMap::default(),
            refs: Vec::new(),
        }
    }

    /// Record for `symbol`, created on first request.
    ///
    /// A `patch` attaches the declaration the symbol resolves to; it is applied
    /// on every call, including to records created earlier by forward
    /// references.
    pub fn get_or_create(&mut self, symbol: S, name: &str, patch: Option<RefTarget>) -> RefId {
        let partition = self.by_name.entry(name.to_string()).or_default();

        let id = match partition.iter().find(|(known, _)| *known == symbol) {
            Some((_, id)) => *id,
            None => {
                let id = RefId::from_index(self.refs.len());
                self.refs.push(RefSpec::new(name));
                partition.push((symbol, id));
                id
            }
        };

        if let Some(target) = patch {
            self.refs[id.index()].target = Some(target);
        }

        id
    }

    /// Record for `symbol` if one was created.
    pub fn lookup(&self, symbol: &S, name: &str) -> Option<RefId> {
        self.by_name
            .get(name)?
            .iter()
            .find(|(known, _)| known == symbol)
            .map(|(_, id)| *id)
    }

    pub fn get(&self, id: RefId) -> &RefSpec {
        &self.refs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Ends the run, handing the records over in creation order.
    pub fn into_refs(self) -> Vec<RefSpec> {
        self.refs
    }
}

impl<S: PartialEq> Default for SymbolRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
