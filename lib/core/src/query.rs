//! Content query capability supplied by the surrounding CMS.
//!
//! The related-content engine never touches storage directly: it builds a
//! [`ContentTypeSelector`] and a [`FilterExpression`] and hands them to a
//! [`QueryService`], or asks for single records by identity.

use std::sync::Arc;
use crate::{ContentTypeSelector, FilterExpression, Record, RecordId, Result};

pub trait QueryService {
    /// Records of the selected content types that satisfy `filter`,
    /// in store order.
    fn content_by_selector(
        &self,
        selector: &ContentTypeSelector,
        filter: &FilterExpression,
    ) -> Result<Vec<Record>>;

    /// A single record by identity, `None` when it does not exist.
    fn content_by_id(&self, id: &RecordId) -> Result<Option<Record>>;
}

impl<T: QueryService + ?Sized> QueryService for &T {
    fn content_by_selector(
        &self,
        selector: &ContentTypeSelector,
        filter: &FilterExpression,
    ) -> Result<Vec<Record>> {
        (**self).content_by_selector(selector, filter)
    }

    fn content_by_id(&self, id: &RecordId) -> Result<Option<Record>> {
        (**self).content_by_id(id)
    }
}

impl<T: QueryService + ?Sized> QueryService for Arc<T> {
    fn content_by_selector(
        &self,
        selector: &ContentTypeSelector,
        filter: &FilterExpression,
    ) -> Result<Vec<Record>> {
        (**self).content_by_selector(selector, filter)
    }

    fn content_by_id(&self, id: &RecordId) -> Result<Option<Record>> {
        (**self).content_by_id(id)
    }
}
