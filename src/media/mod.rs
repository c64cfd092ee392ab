/*!
 * Sign media resolution.
 *
 * - `store`: the local media directory used as a cache
 * - `word_map`: gloss word to media filename table
 * - `fingerspell`: letter-by-letter spelling with per-letter clips
 * - `fetcher`: remote sign dictionary scraping and download
 * - `resolver`: the ordered fallback chain over the above
 */

pub mod fetcher;
pub mod fingerspell;
pub mod resolver;
pub mod store;
pub mod word_map;

pub use fetcher::{ExternalFetcher, NoFetcher, SignFetcher};
pub use fingerspell::fingerspell;
pub use resolver::{CacheLookup, Fingerspelling, MediaResolver, RemoteFetch, ResolveStrategy};
pub use store::MediaStore;
pub use word_map::WordMediaMap;
