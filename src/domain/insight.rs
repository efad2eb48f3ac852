/// Structured insight derived from one voice transcript. Immutable after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub transcript: String,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub intent: String,
    pub keywords: Vec<String>,
    pub summary: Option<String>,
}

impl Insight {
    /// Placeholder insight used when the analysis stage is skipped.
    pub fn neutral(transcript: String, intent: &str) -> Self {
        Self {
            transcript,
            sentiment: Sentiment::Neutral,
            emotion: Emotion::Neutral,
            intent: intent.to_string(),
            keywords: Vec::new(),
            summary: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(format!("invalid sentiment: {}", other)),
        }
    }
}

/// Coarse emotional tone reported by the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Happy,
    Excited,
    Calm,
    Neutral,
    Stressed,
    Frustrated,
    Sad,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Excited => "excited",
            Emotion::Calm => "calm",
            Emotion::Neutral => "neutral",
            Emotion::Stressed => "stressed",
            Emotion::Frustrated => "frustrated",
            Emotion::Sad => "sad",
        }
    }

    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Excited,
        Emotion::Calm,
        Emotion::Neutral,
        Emotion::Stressed,
        Emotion::Frustrated,
        Emotion::Sad,
    ];
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Self::Happy),
            "excited" => Ok(Self::Excited),
            "calm" => Ok(Self::Calm),
            "neutral" => Ok(Self::Neutral),
            "stressed" => Ok(Self::Stressed),
            "frustrated" => Ok(Self::Frustrated),
            "sad" => Ok(Self::Sad),
            other => Err(format!("invalid emotion: {}", other)),
        }
    }
}
