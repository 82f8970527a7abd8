use std::future::Future;

/// Progress of one asynchronous request as a screen sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T, E> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(E),
}

impl<T, E> LoadState<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            LoadState::Failure(error) => Some(error),
            _ => None,
        }
    }

    /// Mark the state as loading, await `future`, then record its outcome.
    pub async fn track<F>(&mut self, future: F)
    where
        F: Future<Output = Result<T, E>>,
    {
        *self = LoadState::Loading;
        *self = future.await.into();
    }
}

impl<T, E> From<Result<T, E>> for LoadState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LoadState::Success(value),
            Err(error) => LoadState::Failure(error),
        }
    }
}
