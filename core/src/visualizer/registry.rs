use crate::evaluator::ScopeId;
use crate::scope::Scope;
use crate::values::Value;

/// Identifies the scopes of one trace by their first-seen position.
#[derive(Debug, Clone, Copy)]
pub struct ScopeRegistry<'t, 'a> {
    scopes: &'t [&'a Scope<'a>],
}

impl<'t, 'a> ScopeRegistry<'t, 'a> {
    pub fn new(scopes: &'t [&'a Scope<'a>]) -> Self {
        Self { scopes }
    }

    pub fn empty() -> Self {
        Self { scopes: &[] }
    }

    /// Position of `scope` in first-seen order, [`ScopeId::UNKNOWN`] if never seen.
    pub fn id_of(&self, scope: &Scope<'a>) -> ScopeId {
        ScopeId(self.scopes.iter().position(|seen| seen.is(scope)))
    }

    /// Whether `value` is bound somewhere along the chain that starts at `scope`.
    pub fn occurs_in(scope: &Scope<'a>, value: &Value<'a>) -> bool {
        scope.chain_contains(value)
    }

    /// Number of registered scopes from which `value` is reachable through a binding.
    pub fn holding(&self, value: &Value<'a>) -> usize {
        self.scopes
            .iter()
            .filter(|scope| Self::occurs_in(scope, value))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    #[test]
    fn test_ids_follow_registration_order() {
        let arena = Bump::new();
        let global = Scope::new(&arena);
        let inner = Scope::enclosed(&arena, global);
        let unseen = Scope::new(&arena);
        let scopes = [global, inner];
        let registry = ScopeRegistry::new(&scopes);

        assert_eq!(registry.id_of(global), ScopeId(Some(0)));
        assert_eq!(registry.id_of(inner), ScopeId(Some(1)));
        assert_eq!(registry.id_of(unseen), ScopeId::UNKNOWN);
        assert_eq!(ScopeRegistry::empty().id_of(global), ScopeId::UNKNOWN);
    }

    #[test]
    fn test_holding_counts_every_scope_reaching_the_value() {
        let arena = Bump::new();
        let global = Scope::new(&arena);
        let inner = Scope::enclosed(&arena, global);
        let sibling = Scope::enclosed(&arena, global);

        let in_global = arena.alloc(Value::Integer(1));
        let in_inner = arena.alloc(Value::Integer(2));
        let nowhere = arena.alloc(Value::Integer(3));
        global.set("a", in_global);
        inner.set("b", in_inner);

        let scopes = [global, inner, sibling];
        let registry = ScopeRegistry::new(&scopes);

        assert_eq!(registry.holding(in_global), 3);
        assert_eq!(registry.holding(in_inner), 1);
        assert_eq!(registry.holding(nowhere), 0);
    }
}
