//! Classifier passes over borehole segment columns
//!
//! Readers deliver boreholes with raw attributes (composite lithology codes,
//! numeric sand medians, CPT logs); these passes turn them into classified
//! segments before projection.

use tracing::debug;

use crate::classifier::{
    AdmixClassifier, LithologyClassifier, SandmedianClassifier, LITHOLOGY_KEY,
};
use crate::models::{AttrValue, Borehole, Segment};

/// Segment attribute holding the numeric sand median (µm)
pub const SANDMEDIAN_ATTR: &str = "sandmedian";

impl Segment {
    /// Numeric sand median, if the segment carries one
    pub fn sandmedian(&self) -> Option<f64> {
        self.attrs.get(SANDMEDIAN_ATTR)?.as_f64()
    }

    /// Replace a composite lithology code by its main lithology and store
    /// the admixtures as attributes.
    pub fn apply_admix(&mut self, admix: &AdmixClassifier) {
        if self.lithology.is_none() {
            return;
        }
        let mut attrs = admix.classify(self.lithology.as_deref());
        self.lithology = attrs.remove(LITHOLOGY_KEY);
        for (name, value) in attrs {
            self.attrs.insert(name, AttrValue::Text(value));
        }
    }
}

impl Borehole {
    /// Deepest segment base
    pub fn depth_from_segments(&self) -> Option<f64> {
        self.segments.iter().map(|s| s.base).max_by(f64::total_cmp)
    }

    pub fn apply_admix(&mut self, admix: &AdmixClassifier) {
        for segment in &mut self.segments {
            segment.apply_admix(admix);
        }
    }

    /// Set `sandmedianclass` on every segment with a numeric sand median.
    /// Segments outside all bins keep their current class.
    pub fn update_sandmedianclass(&mut self, classifier: &SandmedianClassifier) {
        for segment in &mut self.segments {
            if let Some(class) = segment.sandmedian().and_then(|m| classifier.classify(m)) {
                segment.sandmedianclass = Some(class.to_string());
            }
        }
    }

    /// Rebuild the segment column of a CPT from its log.
    ///
    /// Each sample covers the interval down to the next sample; the last one
    /// extends to the borehole depth when that lies deeper. Consecutive
    /// samples with the same lithology become one segment, whose code is then
    /// split by the admix classifier (`Kh2` → `K` with a humus admixture).
    pub fn to_lithology(&mut self, lithology: &LithologyClassifier, admix: &AdmixClassifier) {
        let Some(cpt) = &self.cpt else {
            debug!("{}: no CPT log, keeping segments", self.code);
            return;
        };

        let mut segments: Vec<Segment> = Vec::new();
        for (i, sample) in cpt.samples.iter().enumerate() {
            let top = sample.depth;
            let base = match cpt.samples.get(i + 1) {
                Some(next) => next.depth,
                None => match self.depth {
                    Some(depth) => depth,
                    None => continue,
                },
            };
            if !(base > top) {
                continue;
            }
            let code = lithology.classify(sample.friction_ratio, sample.cone_resistance);
            if let Some(last) = segments.last_mut() {
                if last.lithology.as_deref() == Some(code) && last.base == top {
                    last.base = base;
                    continue;
                }
            }
            if let Ok(segment) = Segment::new(top, base) {
                segments.push(segment.with_lithology(code));
            }
        }

        for segment in &mut segments {
            segment.apply_admix(admix);
        }
        debug!(
            "{}: {} CPT samples -> {} segments",
            self.code,
            cpt.samples.len(),
            segments.len()
        );
        self.segments = segments;
    }

    /// Simplified copy: consecutive segments with equal `key` are merged and
    /// segments thinner than `min_thickness` are absorbed by the segment
    /// above (or below, for the topmost one).
    pub fn simplified<K, F>(&self, min_thickness: Option<f64>, key: F) -> Borehole
    where
        K: PartialEq,
        F: Fn(&Segment) -> K,
    {
        let merged = merge_equal(self.segments.clone(), &key);

        let segments = match min_thickness.filter(|m| *m > 0.0) {
            Some(min) => {
                let mut kept: Vec<Segment> = Vec::with_capacity(merged.len());
                let mut pending_top: Option<f64> = None;
                for segment in &merged {
                    if segment.thickness() < min {
                        match kept.last_mut() {
                            Some(above) => above.base = segment.base,
                            None => {
                                pending_top.get_or_insert(segment.top);
                            }
                        }
                        continue;
                    }
                    let mut segment = segment.clone();
                    if let Some(top) = pending_top.take() {
                        segment.top = top;
                    }
                    kept.push(segment);
                }
                if kept.is_empty() {
                    merged
                } else {
                    merge_equal(kept, &key)
                }
            }
            None => merged,
        };

        Borehole {
            segments,
            ..self.clone()
        }
    }
}

fn merge_equal<K, F>(segments: Vec<Segment>, key: &F) -> Vec<Segment>
where
    K: PartialEq,
    F: Fn(&Segment) -> K,
{
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Some(last) = merged.last_mut() {
            if last.base == segment.top && key(last) == key(&segment) {
                last.base = segment.base;
                continue;
            }
        }
        merged.push(segment);
    }
    merged
}
