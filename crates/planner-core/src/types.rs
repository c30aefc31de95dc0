use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskKind
// ---------------------------------------------------------------------------

/// One of the fixed sub-deliverables a post may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    VideoSmm,
    VideoMaker,
    Text,
    Photogallery,
    CoverPhoto,
    PhotoCards,
}

impl TaskKind {
    pub fn all() -> &'static [TaskKind] {
        &[
            TaskKind::VideoSmm,
            TaskKind::VideoMaker,
            TaskKind::Text,
            TaskKind::Photogallery,
            TaskKind::CoverPhoto,
            TaskKind::PhotoCards,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::VideoSmm => "video_smm",
            TaskKind::VideoMaker => "video_maker",
            TaskKind::Text => "text",
            TaskKind::Photogallery => "photogallery",
            TaskKind::CoverPhoto => "cover_photo",
            TaskKind::PhotoCards => "photo_cards",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskKind::VideoSmm => "Видео-СММ",
            TaskKind::VideoMaker => "Видеоролик",
            TaskKind::Text => "Текст",
            TaskKind::Photogallery => "Фотогалерея",
            TaskKind::CoverPhoto => "Фотообложка",
            TaskKind::PhotoCards => "Фотокарточки",
        }
    }

    pub fn label_en(self) -> &'static str {
        match self {
            TaskKind::VideoSmm => "SMM video",
            TaskKind::VideoMaker => "Video",
            TaskKind::Text => "Text",
            TaskKind::Photogallery => "Photo gallery",
            TaskKind::CoverPhoto => "Cover photo",
            TaskKind::PhotoCards => "Photo cards",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = crate::error::PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video_smm" => Ok(TaskKind::VideoSmm),
            "video_maker" => Ok(TaskKind::VideoMaker),
            "text" => Ok(TaskKind::Text),
            "photogallery" => Ok(TaskKind::Photogallery),
            "cover_photo" => Ok(TaskKind::CoverPhoto),
            "photo_cards" => Ok(TaskKind::PhotoCards),
            _ => Err(crate::error::PlannerError::InvalidTaskKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A staff role tag. A user may hold any number of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Coordinator,
    Smm,
    Designer,
    Videomaker,
    Photographer,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::Admin,
            Role::Coordinator,
            Role::Smm,
            Role::Designer,
            Role::Videomaker,
            Role::Photographer,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coordinator => "coordinator",
            Role::Smm => "smm",
            Role::Designer => "designer",
            Role::Videomaker => "videomaker",
            Role::Photographer => "photographer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "coordinator" => Ok(Role::Coordinator),
            "smm" => Ok(Role::Smm),
            "designer" => Ok(Role::Designer),
            "videomaker" => Ok(Role::Videomaker),
            "photographer" => Ok(Role::Photographer),
            _ => Err(crate::error::PlannerError::InvalidRole(s.to_string())),
        }
    }
}
