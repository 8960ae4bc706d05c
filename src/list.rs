use std::collections::VecDeque;

use crate::api::{Node, Transport};
use crate::client::{CallOptions, FsapiClient};
use crate::error::{FsapiError, Result};
use crate::fsapi_xml::{self as xml, DataItem, FsStatus, ListItem};

/// Iterator over the rows of a device list, fetching one page at a time.
///
/// Paging starts at offset -1 and moves forward by the page size until the
/// device marks the end of the list. Some firmware answers the page after the
/// last one with FS_FAIL instead, this also ends the iteration. Any other error
/// is yielded once, after which the iterator is exhausted.
pub struct ListReader<'a, T: Transport> {
    client: &'a FsapiClient<T>,
    node: Node,
    cursor: i64,
    page_size: u32,
    pending: VecDeque<ListItem>,
    finished: bool,
}

impl<'a, T: Transport> ListReader<'a, T> {
    pub(crate) fn new(client: &'a FsapiClient<T>, node: Node, page_size: u32) -> Self {
        Self {
            client,
            node,
            cursor: -1,
            page_size,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        let path = self.node.list_path(self.cursor);
        let params = [("maxItems", DataItem::from(self.page_size))];

        let response = match self.client.call(&path, &params, CallOptions::default()) {
            Ok(response) => response,
            Err(FsapiError::OutOfRange(_)) => {
                tracing::debug!("{} out of range at {}, treating as end of list", self.node.path(), self.cursor);
                self.finished = true;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let items = xml::parse_list_items(&response.doc)?;
        tracing::trace!("{} items from {} at {}", items.len(), self.node.path(), self.cursor);
        self.pending.extend(items);
        self.cursor += i64::from(self.page_size);

        if xml::has_list_end(&response.doc) || response.status == FsStatus::ListEnd {
            self.finished = true;
        }
        Ok(())
    }
}

impl<T: Transport> Iterator for ListReader<'_, T> {
    type Item = Result<ListItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(Ok(item));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.fetch_page() {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}
