//! 集約ストアとスコープ別キャッシュ
//!
//! スコープ（全世界 or 単一地域）ごとに一度だけ読み込み、
//! 以後はキャッシュから返す。エントリは破棄しない。

use crate::types::{Region, Theatre};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 読込スコープ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Global,
    Region(Region),
}

impl Scope {
    pub const GLOBAL_KEY: &'static str = "global";

    pub fn from_region(region: Option<Region>) -> Self {
        region.map(Scope::Region).unwrap_or(Scope::Global)
    }

    /// キャッシュキー兼エクスポート名（地域名 or "global"）
    pub fn key(&self) -> &'static str {
        match self {
            Scope::Global => Self::GLOBAL_KEY,
            Scope::Region(region) => region.as_str(),
        }
    }

    pub fn region(&self) -> Option<Region> {
        match self {
            Scope::Global => None,
            Scope::Region(region) => Some(*region),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// スコープ → スナップショット
#[derive(Debug, Clone, Default)]
pub struct ScopeCache {
    entries: HashMap<Scope, Arc<[Theatre]>>,
}

impl ScopeCache {
    pub fn get(&self, scope: Scope) -> Option<Arc<[Theatre]>> {
        self.entries.get(&scope).cloned()
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.entries.contains_key(&scope)
    }

    /// 初回のみ登録（既存エントリは差し替えない）
    pub fn insert(&mut self, scope: Scope, theatres: Arc<[Theatre]>) -> Arc<[Theatre]> {
        self.entries.entry(scope).or_insert(theatres).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 集約ストア（現在スコープのレコード列 + キャッシュ）
#[derive(Debug, Clone)]
pub struct AggregateStore {
    scope: Scope,
    theatres: Arc<[Theatre]>,
    cache: ScopeCache,
}

impl AggregateStore {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            theatres: Arc::from(Vec::new()),
            cache: ScopeCache::default(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// 読込順のレコード列
    pub fn theatres(&self) -> &[Theatre] {
        &self.theatres
    }

    pub fn snapshot(&self) -> Arc<[Theatre]> {
        self.theatres.clone()
    }

    pub fn len(&self) -> usize {
        self.theatres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theatres.is_empty()
    }

    pub fn cache(&self) -> &ScopeCache {
        &self.cache
    }

    /// キャッシュ済みならそのスナップショットに切り替える
    pub(crate) fn activate_cached(&mut self, scope: Scope) -> bool {
        match self.cache.get(scope) {
            Some(theatres) => {
                self.scope = scope;
                self.theatres = theatres;
                true
            }
            None => false,
        }
    }

    /// 読込完了したレコード列をキャッシュに登録して現在スコープにする
    pub(crate) fn commit(&mut self, scope: Scope, theatres: Vec<Theatre>) {
        let theatres = self.cache.insert(scope, Arc::from(theatres));
        self.scope = scope;
        self.theatres = theatres;
    }
}
