/// Lifecycle of an asynchronously obtained value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteData<E, A> {
    NotAsked,
    Loading,
    Failure(E),
    Succeed(A),
}

impl<E, A> Default for RemoteData<E, A> {
    fn default() -> Self {
        Self::NotAsked
    }
}

impl<E, A> RemoteData<E, A> {
    pub fn is_not_asked(&self) -> bool {
        matches!(self, Self::NotAsked)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&A> {
        match self {
            Self::Succeed(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteData;

    #[test]
    fn default_is_not_asked() {
        let data: RemoteData<String, u8> = RemoteData::default();
        assert!(data.is_not_asked());
    }

    #[test]
    fn accessors_only_see_their_own_variant() {
        let ok: RemoteData<String, u8> = RemoteData::Succeed(2);
        assert_eq!(ok.success(), Some(&2));
        assert_eq!(ok.failure(), None);

        let err: RemoteData<String, u8> = RemoteData::Failure("boom".to_string());
        assert_eq!(err.failure().map(String::as_str), Some("boom"));
        assert_eq!(err.success(), None);
        assert!(!err.is_loading());
    }
}
