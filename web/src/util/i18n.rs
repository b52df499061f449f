//! Interface language: a two-locale string table and its persisted choice.
//!
//! SYSTEM CONTEXT
//! ==============
//! The composition root loads the saved locale into an `RwSignal<Locale>`
//! context; the nav-bar switcher flips it and writes it back to
//! `localStorage`. Chinese is the default when nothing is saved and the
//! browser language is not English.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

/// `localStorage` key holding the chosen locale code.
pub const LOCALE_KEY: &str = "i18nextLng";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::Zh, Self::En];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Accepts bare and region-qualified codes (`en`, `en-US`, `zh_CN`).
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        Self::ALL.into_iter().find(|locale| locale.code() == primary)
    }

    /// Name of the locale in its own language, for the switcher.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Zh => "中文",
            Self::En => "English",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Zh => Self::En,
            Self::En => Self::Zh,
        }
    }
}

/// Saved choice first, then the browser language, then the default.
#[must_use]
pub fn resolve_locale(saved: Option<&str>, browser: Option<&str>) -> Locale {
    saved
        .and_then(Locale::parse)
        .or_else(|| browser.and_then(Locale::parse))
        .unwrap_or_default()
}

/// Translatable interface strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Text {
    Models,
    Datasets,
    SignIn,
    SignUp,
    SignOut,
    Tagline,
    Search,
    LoginSuccess,
    RegisterSuccess,
    LogoutSuccess,
    CopyLink,
    Copy,
    Copied,
    LinkCopied,
    CopyFailed,
}

#[must_use]
pub fn tr(locale: Locale, text: Text) -> &'static str {
    let (zh, en) = match text {
        Text::Models => ("模型", "Models"),
        Text::Datasets => ("数据集", "Datasets"),
        Text::SignIn => ("登录", "Sign in"),
        Text::SignUp => ("注册", "Sign up"),
        Text::SignOut => ("退出登录", "Sign out"),
        Text::Tagline => ("发现、分享和下载模型与数据集。", "Discover, share and download models and datasets."),
        Text::Search => ("搜索", "Search"),
        Text::LoginSuccess => ("登录成功", "Signed in."),
        Text::RegisterSuccess => ("注册成功", "Account created."),
        Text::LogoutSuccess => ("已退出登录", "Signed out."),
        Text::CopyLink => ("复制链接", "Copy link"),
        Text::Copy => ("复制", "Copy"),
        Text::Copied => ("已复制到剪贴板", "Copied to clipboard."),
        Text::LinkCopied => ("链接已复制到剪贴板", "Link copied to clipboard."),
        Text::CopyFailed => ("复制失败", "Copy failed."),
    };
    match locale {
        Locale::Zh => zh,
        Locale::En => en,
    }
}

/// Locale saved in `localStorage`, else the browser's, else the default.
#[must_use]
pub fn load_locale() -> Locale {
    #[cfg(feature = "csr")]
    {
        let saved = match crate::util::storage::local_storage() {
            Ok(storage) => storage.get_item(LOCALE_KEY).unwrap_or_default(),
            Err(err) => {
                log::debug!("locale load skipped: {err}");
                None
            }
        };
        let browser = web_sys::window().and_then(|window| window.navigator().language());
        resolve_locale(saved.as_deref(), browser.as_deref())
    }
    #[cfg(not(feature = "csr"))]
    {
        resolve_locale(None, None)
    }
}

pub fn save_locale(locale: Locale) {
    #[cfg(feature = "csr")]
    {
        let saved = crate::util::storage::local_storage()
            .and_then(|storage| {
                storage
                    .set_item(LOCALE_KEY, locale.code())
                    .map_err(|e| olahub::error::StorageError::Unavailable(format!("{e:?}")))
            });
        if let Err(err) = saved {
            log::warn!("locale not saved: {err}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        log::debug!("locale {} not persisted outside the browser", locale.code());
    }
}
