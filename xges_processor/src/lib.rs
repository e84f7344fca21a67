//! # XGES Processor: Converting GES Editing Projects to and from Timelines
//!
//! This crate reads and writes XGES, the XML project format of the GStreamer Editing
//! Services (GES), and converts it to and from the editorial [`Timeline`] model defined in
//! `timeline_core`.
//!
//! The two primary functions you will use are:
//! - [`parse_xges`]: Converts an XGES string into a `Timeline`.
//! - [`generate_xges`]: Creates an XGES string from a `Timeline`.
//!
//! [`XgesDecoder`] and [`XgesEncoder`] wrap the same conversions around any
//! `std::io::Read` / `std::io::Write` stream and report the frame rate they used.
//!
//! ## How the Formats Map
//!
//! A timeline is a list of tracks, each an ordered sequence of clips, gaps and transitions.
//! XGES instead stores *layers* of clips positioned by absolute nanosecond `start` values.
//! When generating, every track becomes one layer (video tracks first), gaps only move the
//! position of the next element, and each clip or transition is placed at that position.
//! When parsing, clips are grouped back into one track per kind and gaps are re-inserted
//! wherever a clip starts later than the previous one ended.
//!
//! Attribute values such as `properties` and `metadatas` use GStreamer's structure
//! serialization (`name, key=(type)value, ...;`). The [`structure`] module parses and prints
//! them.
//!
//! ## ⚠️ Frame Rate Is Heuristic
//!
//! The whole timeline uses a single frame rate: the rate of the first clip found in the first
//! video track (then the first audio track) when generating, and the `framerate` of the video
//! track's restriction caps (then the timeline metadata) when parsing. If none is found the
//! configured default of 25 fps is used. Timelines mixing several rates are not supported.
//!
//! ## Examples
//!
//! ```rust
//! use timeline_core::{
//!     Clip, MediaReference, RationalTime, TimeRange, Timeline, Track, TrackKind,
//!     XgesGenerationOptions, XgesParsingOptions,
//! };
//! use xges_processor::{generate_xges, parse_xges};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Build a timeline with a single 2 second clip at 24 fps
//!     let mut track = Track::new("V1", TrackKind::Video);
//!     track.append_child(Clip {
//!         name: "Shot 1".into(),
//!         media_reference: MediaReference::external("file:///media/shot1.mov"),
//!         source_range: Some(TimeRange::new(
//!             RationalTime::new(0.0, 24.0),
//!             RationalTime::new(48.0, 24.0),
//!         )),
//!         ..Default::default()
//!     });
//!     let mut timeline = Timeline::new("My Edit");
//!     timeline.add_track(track);
//!
//!     // 2. Generate the XGES document
//!     let xges = generate_xges(&timeline, &XgesGenerationOptions::default())?;
//!     assert!(xges.contains(r#"duration="2000000000""#));
//!
//!     // 3. Parse it back
//!     let parsed = parse_xges(&xges, &XgesParsingOptions::default())?;
//!     assert_eq!(parsed.name, "My Edit");
//!
//!     let clip = parsed.tracks[0].clips().next().unwrap();
//!     assert_eq!(clip.name, "Shot 1");
//!     assert_eq!(clip.duration()?.to_seconds(), 2.0);
//!
//!     Ok(())
//! }
//! ```

mod classifier;
pub mod generator;
pub mod parser;
pub mod schema;
pub mod structure;
pub mod time;

pub use classifier::{
    DEFAULT_TEST_PATTERN, TITLE_GENERATOR_KIND, transition_asset_id, transition_type_from_asset,
};
pub use generator::{XgesEncoder, generate_xges};
pub use parser::{XgesDecoder, parse_xges};

#[doc(no_inline)]
pub use timeline_core::Timeline;
