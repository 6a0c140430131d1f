//! Component library bootstrap

use std::sync::Arc;

use crate::library::ComponentLibrary;
use crate::steps::StepStatus;
use crate::{EnhanceError, EnhancedPage};

/// Run every library's initialiser; one failing does not stop the rest
pub(crate) fn run(page: &mut EnhancedPage, libraries: &[Arc<dyn ComponentLibrary>]) -> Result<StepStatus, EnhanceError> {
    if libraries.is_empty() {
        return Ok(StepStatus::Skipped("no component libraries registered"));
    }

    let mut first_error = None;
    for library in libraries {
        match library.init_all(&mut page.document) {
            Ok(()) => tracing::debug!("Initialised component library {}", library.name()),
            Err(source) => {
                tracing::warn!("Component library {} failed: {}", library.name(), source);
                first_error.get_or_insert(EnhanceError::Library {
                    name: library.name().to_string(),
                    source,
                });
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(StepStatus::Applied),
    }
}
