//! The curation session: stored images, the reference, the ranking and the feed.

use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::caption;
use crate::captioner::{generate_captions, CaptionLimits, CaptionService};
use crate::error::FeedError;
use crate::feed::{FeedEntry, FeedState, PinOutcome, SelectOutcome};
use crate::ingest::DecodedImage;
use crate::matching::{rank_by_similarity, MatchParams, Ranking};
use crate::mood::{interpret, validate_theme, MoodResult};
use crate::palette::Palette;

/// Session-unique image handle, shown as `img_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img_{}", self.0)
    }
}

impl Serialize for ImageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    pub id: ImageId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip)]
    pub raw: Arc<[u8]>,
    pub palette: Palette,
    /// Similarity to the current reference; lower is closer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Theme and mood of the last generation.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub theme: String,
    pub mood: MoodResult,
}

#[derive(Debug, Default)]
pub struct Session {
    images: Vec<ImageRecord>,
    reference: Option<ImageRecord>,
    next_id: u64,
    params: MatchParams,
    ranking: Option<Ranking>,
    feed: FeedState,
    generation: Option<Generation>,
}

impl Session {
    pub fn new(params: MatchParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    fn record(&mut self, image: DecodedImage) -> ImageRecord {
        self.next_id += 1;
        ImageRecord {
            id: ImageId(self.next_id),
            name: image.name,
            path: image.path,
            raw: image.raw,
            palette: image.palette,
            score: None,
        }
    }

    /// Store decoded images, assigning ids in input order.
    pub fn add_images(&mut self, images: Vec<DecodedImage>) -> Vec<ImageId> {
        let ids: Vec<ImageId> = images
            .into_iter()
            .map(|image| {
                let record = self.record(image);
                let id = record.id;
                self.images.push(record);
                id
            })
            .collect();
        tracing::info!(added = ids.len(), total = self.images.len(), "stored images");
        self.rerank();
        ids
    }

    /// Replace the reference image and re-run matching.
    pub fn set_reference(&mut self, image: DecodedImage) -> ImageId {
        let record = self.record(image);
        let id = record.id;
        tracing::info!(%id, name = %record.name, "reference image set");
        self.reference = Some(record);
        self.rerank();
        id
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
        self.rerank();
    }

    /// Drop every image, the reference and the feed. Ids are never reused.
    pub fn clear(&mut self) {
        self.images.clear();
        self.reference = None;
        self.ranking = None;
        self.feed = FeedState::default();
        self.generation = None;
    }

    fn rerank(&mut self) {
        self.ranking = self.reference.as_ref().map(|reference| {
            rank_by_similarity(
                &reference.palette,
                self.images.iter().map(|img| (img.id, &img.palette)),
                self.params,
            )
        });
        for image in &mut self.images {
            image.score = self.ranking.as_ref().and_then(|r| r.score_of(image.id));
        }
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageRecord> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn reference(&self) -> Option<&ImageRecord> {
        self.reference.as_ref()
    }

    pub fn ranking(&self) -> Option<&Ranking> {
        self.ranking.as_ref()
    }

    pub fn params(&self) -> MatchParams {
        self.params
    }

    pub fn feed(&self) -> &FeedState {
        &self.feed
    }

    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    /// Ids to caption: ranked survivors, or every image in input order when
    /// there is no reference or nothing matched.
    pub fn candidate_order(&self) -> Vec<ImageId> {
        let all: Vec<ImageId> = self.images.iter().map(|img| img.id).collect();
        match &self.ranking {
            Some(ranking) => ranking.order_or_fallback(&all),
            None => all,
        }
    }

    fn dominant_reference_color(&self) -> Option<&crate::color::Color> {
        self.reference.as_ref().and_then(|r| r.palette.primary())
    }

    /// Build a fresh feed: resolve the mood once, caption every candidate
    /// (remote first when a service is given), and replace the current feed.
    pub async fn generate<R: Rng>(
        &mut self,
        theme: &str,
        service: Option<Arc<dyn CaptionService>>,
        limits: CaptionLimits,
        rng: &mut R,
    ) -> Result<&FeedState, FeedError> {
        let theme = validate_theme(theme)?.to_string();
        if self.images.is_empty() {
            return Err(FeedError::no_candidates());
        }

        if self.ranking.as_ref().is_some_and(Ranking::is_no_match) {
            tracing::warn!("no images match the reference colors, using all images");
        }

        let order = self.candidate_order();
        let raws: Vec<Arc<[u8]>> = order
            .iter()
            .map(|id| {
                self.image(*id)
                    .map(|img| Arc::clone(&img.raw))
                    .ok_or(FeedError::UnknownImage(*id))
            })
            .collect::<Result<_, _>>()?;

        let mood = interpret(&theme, self.dominant_reference_color(), rng);
        tracing::info!(mood = %mood.mood, source = ?mood.source, "resolved mood");

        let captions = generate_captions(service, &raws, &mood, limits, rng).await;

        let entries = order
            .into_iter()
            .zip(captions)
            .map(|(id, caption)| FeedEntry::new(id, caption))
            .collect();
        self.feed = FeedState::new(entries);
        self.generation = Some(Generation { theme, mood });

        Ok(&self.feed)
    }

    /// New local caption for one entry using the session mood.
    pub fn regenerate_caption<R: Rng>(&mut self, id: ImageId, rng: &mut R) -> Result<&str, FeedError> {
        let generation = self.generation.as_ref().ok_or(FeedError::UnknownEntry(id))?;
        let text = caption::synthesize(generation.mood.mood.tag(), &generation.mood.hashtags, rng);
        self.set_caption(id, text)
    }

    /// New local caption for one entry from a different theme. The session
    /// mood is left alone.
    pub fn regenerate_with_theme<R: Rng>(
        &mut self,
        id: ImageId,
        theme: &str,
        rng: &mut R,
    ) -> Result<&str, FeedError> {
        let theme = validate_theme(theme)?;
        if self.feed.get(id).is_none() {
            return Err(FeedError::UnknownEntry(id));
        }
        let mood = interpret(theme, self.dominant_reference_color(), rng);
        let text = caption::synthesize(mood.mood.tag(), &mood.hashtags, rng);
        self.set_caption(id, text)
    }

    fn set_caption(&mut self, id: ImageId, text: String) -> Result<&str, FeedError> {
        self.feed.regenerate_caption(id, text)?;
        self.feed
            .get(id)
            .map(|entry| entry.caption.as_str())
            .ok_or(FeedError::UnknownEntry(id))
    }

    pub fn pin(&mut self, id: ImageId) -> Result<PinOutcome, FeedError> {
        self.feed.pin(id)
    }

    pub fn select(&mut self, id: ImageId) -> Result<SelectOutcome, FeedError> {
        self.feed.select(id)
    }

    pub fn remove_entry(&mut self, id: ImageId) -> Result<FeedEntry, FeedError> {
        self.feed.remove(id)
    }

    /// Feed entries paired with their images, in feed order.
    pub fn feed_items(&self) -> Result<Vec<(&ImageRecord, &FeedEntry)>, FeedError> {
        self.feed
            .entries()
            .iter()
            .map(|entry| {
                self.image(entry.image_id)
                    .map(|img| (img, entry))
                    .ok_or(FeedError::UnknownImage(entry.image_id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn decoded(name: &str, hexes: &[&str]) -> DecodedImage {
        DecodedImage {
            name: name.to_string(),
            path: None,
            raw: Arc::from(name.as_bytes().to_vec()),
            palette: Palette::from_hex(hexes).unwrap(),
        }
    }

    fn session_with_images() -> Session {
        let mut session = Session::new(MatchParams::default());
        session.add_images(vec![
            decoded("blue.png", &["#0000FF", "#1010F0", "#2020E0"]),
            decoded("red.png", &["#FF0000", "#F01010", "#E02020"]),
            decoded("green.png", &["#00FF00", "#10F010", "#20E020"]),
        ]);
        session
    }

    fn names(session: &Session, ids: &[ImageId]) -> Vec<String> {
        ids.iter()
            .map(|id| session.image(*id).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_image_id_display_and_json() {
        assert_eq!(ImageId(7).to_string(), "img_7");
        assert_eq!(serde_json::to_string(&ImageId(7)).unwrap(), "\"img_7\"");
    }

    #[test]
    fn test_ids_are_monotonic_across_clear() {
        let mut session = session_with_images();
        let ids: Vec<u64> = session.images().iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        session.clear();
        assert!(session.images().is_empty());
        let new = session.add_images(vec![decoded("x.png", &["#FFFFFF"])]);
        assert_eq!(new, vec![ImageId(4)]);
    }

    #[tokio::test]
    async fn test_clear_drops_reference_and_feed() {
        let mut session = session_with_images();
        session.set_reference(decoded("ref.png", &["#FF0000"]));
        session
            .generate("fun", None, CaptionLimits::default(), &mut StdRng::seed_from_u64(6))
            .await
            .unwrap();
        assert!(session.reference().is_some());

        session.clear();
        assert!(session.reference().is_none());
        assert!(session.ranking().is_none());
        assert!(session.feed().is_empty());
        assert!(session.generation().is_none());
        assert_eq!(session.params(), MatchParams::default());
        let err = session
            .generate("fun", None, CaptionLimits::default(), &mut StepRng::new(0, 0))
            .await
            .unwrap_err();
        assert_eq!(err, FeedError::no_candidates());
    }

    #[test]
    fn test_reference_ranks_closest_first() {
        let mut session = session_with_images();
        session.set_reference(decoded("ref.png", &["#FF0000", "#F01010", "#E02020"]));

        let ranking = session.ranking().unwrap();
        assert!(!ranking.is_no_match());
        assert_eq!(names(&session, &session.candidate_order()), vec!["red.png"]);
        let red = session.images().iter().find(|i| i.name == "red.png").unwrap();
        assert_eq!(red.score, Some(0.0));
    }

    #[test]
    fn test_no_match_falls_back_to_input_order() {
        let mut session = session_with_images();
        session.set_reference(decoded("ref.png", &["#777777"]));
        assert!(session.ranking().unwrap().is_no_match());
        assert_eq!(
            names(&session, &session.candidate_order()),
            vec!["blue.png", "red.png", "green.png"]
        );
        // scores stay attached even without survivors
        assert!(session.images().iter().all(|i| i.score.is_some()));
    }

    #[test]
    fn test_replacing_reference_reranks() {
        let mut session = session_with_images();
        session.set_reference(decoded("ref.png", &["#FF0000"]));
        session.set_reference(decoded("ref2.png", &["#00FF00"]));
        assert_eq!(names(&session, &session.candidate_order()), vec!["green.png"]);
        session.clear_reference();
        assert!(session.ranking().is_none());
        assert_eq!(session.candidate_order().len(), 3);
    }

    #[test]
    fn test_added_images_are_ranked_against_reference() {
        let mut session = Session::new(MatchParams::default());
        session.set_reference(decoded("ref.png", &["#0000FF"]));
        session.add_images(vec![decoded("blue.png", &["#0000FF"])]);
        assert_eq!(session.images()[0].score, Some(0.0));
    }

    #[tokio::test]
    async fn test_generate_validates_before_work() {
        let mut session = session_with_images();
        let err = session
            .generate("   ", None, CaptionLimits::default(), &mut StepRng::new(0, 0))
            .await
            .unwrap_err();
        assert_eq!(err, FeedError::empty_theme());
        assert!(session.feed().is_empty());

        let mut empty = Session::default();
        let err = empty
            .generate("beach", None, CaptionLimits::default(), &mut StepRng::new(0, 0))
            .await
            .unwrap_err();
        assert_eq!(err, FeedError::no_candidates());
    }

    #[tokio::test]
    async fn test_generate_builds_feed_in_candidate_order() {
        let mut session = session_with_images();
        let feed = session
            .generate(
                "a romantic evening",
                None,
                CaptionLimits::default(),
                &mut StdRng::seed_from_u64(5),
            )
            .await
            .unwrap();
        let ids: Vec<u64> = feed.entries().iter().map(|e| e.image_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(feed
            .entries()
            .iter()
            .all(|e| e.caption.ends_with("#romantic #love #aesthetic")));
        assert_eq!(session.generation().unwrap().mood.mood, Mood::Romantic);
    }

    #[tokio::test]
    async fn test_generate_uses_reference_color_for_mood() {
        let mut session = session_with_images();
        session.set_reference(decoded("ref.png", &["#40C040"]));
        session
            .generate("my photos", None, CaptionLimits::default(), &mut StepRng::new(0, 0))
            .await
            .unwrap();
        assert_eq!(session.generation().unwrap().mood.mood, Mood::Nature);
        // no candidate is close enough, so every image is captioned
        assert!(session.ranking().unwrap().is_no_match());
        assert_eq!(session.feed().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_replaces_feed() {
        let mut session = session_with_images();
        let mut rng = StdRng::seed_from_u64(1);
        session
            .generate("chill", None, CaptionLimits::default(), &mut rng)
            .await
            .unwrap();
        session.pin(ImageId(3)).unwrap();
        session
            .generate("chill", None, CaptionLimits::default(), &mut rng)
            .await
            .unwrap();
        assert!(session.feed().pinned().is_empty());
        assert_eq!(session.feed().len(), 3);
    }

    #[tokio::test]
    async fn test_regenerate_caption_keeps_mood_and_order() {
        let mut session = session_with_images();
        let mut rng = StdRng::seed_from_u64(2);
        session
            .generate("dark mystery", None, CaptionLimits::default(), &mut rng)
            .await
            .unwrap();
        session.pin(ImageId(2)).unwrap();

        let text = session
            .regenerate_caption(ImageId(2), &mut StepRng::new(0, 0))
            .unwrap()
            .to_string();
        assert_eq!(
            text,
            "Once upon a time, in a mysterious moment captured forever... ✨ #mysterious #moody #darkaesthetic"
        );
        let ids: Vec<u64> = session.feed().entries().iter().map(|e| e.image_id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_regenerate_with_theme() {
        let mut session = session_with_images();
        let mut rng = StdRng::seed_from_u64(3);
        session
            .generate("chill", None, CaptionLimits::default(), &mut rng)
            .await
            .unwrap();

        let text = session
            .regenerate_with_theme(ImageId(1), "wild travel", &mut rng)
            .unwrap()
            .to_string();
        assert!(text.ends_with("#adventure #explore #wanderlust"));
        assert_eq!(session.generation().unwrap().mood.mood, Mood::Chill);

        assert!(matches!(
            session.regenerate_with_theme(ImageId(1), " ", &mut rng),
            Err(FeedError::Validation(_))
        ));
        assert_eq!(
            session.regenerate_with_theme(ImageId(42), "fun", &mut rng),
            Err(FeedError::UnknownEntry(ImageId(42)))
        );
    }

    #[test]
    fn test_regenerate_before_generate_is_unknown_entry() {
        let mut session = session_with_images();
        assert_eq!(
            session.regenerate_caption(ImageId(1), &mut StepRng::new(0, 0)),
            Err(FeedError::UnknownEntry(ImageId(1)))
        );
    }

    #[tokio::test]
    async fn test_feed_items_follow_feed_order() {
        let mut session = session_with_images();
        session
            .generate("fun", None, CaptionLimits::default(), &mut StdRng::seed_from_u64(4))
            .await
            .unwrap();
        session.select(ImageId(1)).unwrap();
        session.select(ImageId(3)).unwrap();
        session.remove_entry(ImageId(2)).unwrap();

        let items = session.feed_items().unwrap();
        let names: Vec<&str> = items.iter().map(|(img, _)| img.name.as_str()).collect();
        assert_eq!(names, vec!["green.png", "blue.png"]);
    }
}
