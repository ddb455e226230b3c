//! # Paginated Listing Fetcher
//!
//! Walks the Mirakl accounting-document listing page by page until the full
//! result set has been retrieved. The offset advances by exactly the page
//! size on every round trip, never by the number of items actually received,
//! so servers that return short pages before the last page are handled
//! correctly. Termination is driven by the `total_count` the server reports
//! alongside each page.
//!
//! Any transport or API error aborts the whole fetch and propagates to the
//! caller; there is no partial-page retry at this layer.

use crate::clients::mirakl::{GetInvoicesRequest, MiraklClient, MiraklInvoice};
use crate::error::Result;
use tracing::{debug, warn};

/// Fetch every record matching `request` across as many pages as needed.
pub async fn fetch_all_invoices(
    client: &dyn MiraklClient,
    request: &GetInvoicesRequest,
) -> Result<Vec<MiraklInvoice>> {
    let mut accumulated: Vec<MiraklInvoice> = Vec::new();
    let mut page_request = request.clone();
    let mut offset = 0;

    loop {
        page_request.offset = offset;
        let page = client.get_invoices(&page_request).await?;
        let received = page.invoices.len();
        accumulated.extend(page.invoices);

        debug!(
            document_type = page_request.document_type.as_str(),
            offset,
            received,
            accumulated = accumulated.len(),
            total_count = page.total_count,
            "Fetched accounting-document page"
        );

        if page.total_count <= accumulated.len() as u64 {
            break;
        }
        if received == 0 {
            // The server claims there are more records but stopped serving
            // them; bail out with what we have instead of spinning.
            warn!(
                total_count = page.total_count,
                accumulated = accumulated.len(),
                "Listing reported more records than it returned, stopping pagination"
            );
            break;
        }
        offset += page_request.max;
    }

    Ok(accumulated)
}
