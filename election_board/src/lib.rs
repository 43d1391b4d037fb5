/*!
Rendering pipeline for election-result and notice pages.

Every stage is a pure function of its input, so each can be tested without a
browser or a network:

- [`notices`]: conversion of the `date|title|content[|pdf]` ledger, sorting
  and date formatting.
- [`results`]: result documents, candidate ordering and the per-section
  aggregation of tagged per-source outcomes.
- [`chart`]: two-wedge pie chart geometry.
- [`render`]: HTML fragments for all of the above.
- [`refresh`]: the single-flight guard for the refresh loop.

Fetching the data files and scheduling refreshes is left to the caller; the
`electboard` command line drives this library. See the [`manual`] for the
data formats.
*/

mod config;
pub mod chart;
pub mod manual;
pub mod notices;
pub mod refresh;
pub mod render;
pub mod results;

pub use crate::config::*;
