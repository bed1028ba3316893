//! The role table.
//!
//! Roles are ordered by how often they are expected to occur, not
//! alphabetically, with [`Role::Unknown`] pinned at ordinal 0. The ordinal is
//! what crosses the wire, and variable-length integer encodings spend fewer
//! bytes on small values, so the most common roles come first.
//!
//! The table is part of the wire contract. Appending new roles at the end is
//! compatible; inserting, removing or reordering entries is a format break.

use std::fmt;

macro_rules! role_table {
    ($($(#[$meta:meta])* $variant:ident,)*) => {
        /// The semantic kind of an accessibility node.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(into = "u8", try_from = "u8")
        )]
        #[repr(u8)]
        pub enum Role {
            $($(#[$meta])* $variant,)*
        }

        impl Role {
            /// Every role, indexed by ordinal.
            pub const ALL: &'static [Role] = &[$(Role::$variant,)*];

            const NAMES: &'static [&'static str] = &[$(stringify!($variant),)*];
        }
    };
}

role_table! {
    /// The catch-all role for nodes whose kind is not known. Always ordinal 0.
    #[default]
    Unknown,
    /// One run of text inside a text node, used for text navigation.
    InlineTextBox,
    Cell,
    StaticText,
    Image,
    Link,
    Row,
    ListItem,
    /// The bullet or number that precedes a list item.
    ListMarker,
    TreeItem,
    ListBoxOption,
    MenuItem,
    MenuListOption,
    Paragraph,
    /// A grouping node with no semantics of its own.
    ///
    /// Platform adapters drop it from the exposed tree and hoist its children.
    GenericContainer,
    CheckBox,
    RadioButton,
    TextInput,
    Button,
    DefaultButton,
    Pane,
    RowHeader,
    ColumnHeader,
    Column,
    RowGroup,
    List,
    Table,
    TableHeaderContainer,
    LayoutTableCell,
    LayoutTableRow,
    LayoutTable,
    Switch,
    ToggleButton,
    Menu,
    MultilineTextInput,
    SearchInput,
    DateInput,
    DateTimeInput,
    WeekInput,
    MonthInput,
    TimeInput,
    EmailInput,
    NumberInput,
    PasswordInput,
    PhoneNumberInput,
    UrlInput,
    Abbr,
    Alert,
    AlertDialog,
    Application,
    Article,
    Audio,
    Banner,
    Blockquote,
    Canvas,
    Caption,
    Caret,
    Code,
    ColorWell,
    ComboBox,
    EditableComboBox,
    Complementary,
    Comment,
    ContentDeletion,
    ContentInsertion,
    ContentInfo,
    Definition,
    DescriptionList,
    DescriptionListDetail,
    DescriptionListTerm,
    Details,
    Dialog,
    Directory,
    DisclosureTriangle,
    Document,
    EmbeddedObject,
    Emphasis,
    Feed,
    FigureCaption,
    Figure,
    Footer,
    FooterAsNonLandmark,
    Form,
    Grid,
    Group,
    Header,
    HeaderAsNonLandmark,
    Heading,
    Iframe,
    IframePresentational,
    ImeCandidate,
    Keyboard,
    Legend,
    LineBreak,
    ListBox,
    Log,
    Main,
    Mark,
    Marquee,
    Math,
    MenuBar,
    MenuItemCheckBox,
    MenuItemRadio,
    MenuListPopup,
    Meter,
    Navigation,
    Note,
    PluginObject,
    Portal,
    Pre,
    ProgressIndicator,
    RadioGroup,
    Region,
    RootWebArea,
    Ruby,
    RubyAnnotation,
    ScrollBar,
    ScrollView,
    Search,
    Section,
    Slider,
    SpinButton,
    Splitter,
    Status,
    Strong,
    Suggestion,
    SvgRoot,
    Tab,
    TabList,
    TabPanel,
    Term,
    Time,
    Timer,
    TitleBar,
    Toolbar,
    Tooltip,
    Tree,
    TreeGrid,
    Video,
    WebView,
    Window,
    PdfActionableHighlight,
    PdfRoot,
    GraphicsDocument,
    GraphicsObject,
    GraphicsSymbol,
    DocAbstract,
    DocAcknowledgements,
    DocAfterword,
    DocAppendix,
    DocBackLink,
    DocBiblioEntry,
    DocBibliography,
    DocBiblioRef,
    DocChapter,
    DocColophon,
    DocConclusion,
    DocCover,
    DocCredit,
    DocCredits,
    DocDedication,
    DocEndnote,
    DocEndnotes,
    DocEpigraph,
    DocEpilogue,
    DocErrata,
    DocExample,
    DocFootnote,
    DocForeword,
    DocGlossary,
    DocGlossRef,
    DocIndex,
    DocIntroduction,
    DocNoteRef,
    DocNotice,
    DocPageBreak,
    DocPageFooter,
    DocPageHeader,
    DocPageList,
    DocPart,
    DocPreface,
    DocPrologue,
    DocPullquote,
    DocQna,
    DocSubtitle,
    DocTip,
    DocToc,
    /// A list presented as a grid of rows and columns.
    ListGrid,
    /// A multi-line text area that behaves like a terminal emulator.
    Terminal,
}

impl Role {
    /// Number of roles in the table.
    pub const COUNT: usize = Self::ALL.len();

    /// The wire ordinal of this role.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look up a role by its wire ordinal.
    ///
    /// Returns `None` for ordinals past the end of the table.
    #[inline]
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// The variant name, for diagnostics.
    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Roles whose selection state is carried by their toggled state.
    pub fn is_radio_like(self) -> bool {
        matches!(self, Self::RadioButton | Self::MenuItemRadio)
    }

    /// Roles that accept free-form text input.
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            Self::TextInput
                | Self::MultilineTextInput
                | Self::SearchInput
                | Self::DateInput
                | Self::DateTimeInput
                | Self::WeekInput
                | Self::MonthInput
                | Self::TimeInput
                | Self::EmailInput
                | Self::NumberInput
                | Self::PasswordInput
                | Self::PhoneNumberInput
                | Self::UrlInput
                | Self::EditableComboBox
                | Self::Terminal
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when decoding an ordinal that is not in the role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no role with ordinal {0}")]
pub struct UnknownRoleOrdinal(pub u8);

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role.ordinal()
    }
}

impl TryFrom<u8> for Role {
    type Error = UnknownRoleOrdinal;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(ordinal).ok_or(UnknownRoleOrdinal(ordinal))
    }
}
