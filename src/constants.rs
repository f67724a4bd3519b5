//! Common constants used throughout create-local-app.

/// Project-local configuration file; also the marker file of a template
pub const LOCAL_CONFIG_FILE: &str = ".create-local-app.json";

/// File whose presence identifies a project root for reverse operations
pub const PROJECT_MARKER: &str = "wails.json";

/// Registry root directory name under the user's home
pub const USER_CONFIG_DIR: &str = ".create-local-app";

/// User-global configuration file name inside the registry root
pub const USER_CONFIG_FILE: &str = "config.json";

/// Version marker file name inside the registry root
pub const VERSION_FILE: &str = "VERSION";

pub const TEMPLATES_DIR: &str = "templates";
pub const SYSTEM_TIER: &str = "system";
pub const CONTRIBUTED_TIER: &str = "contributed";

/// Name of the system template used when nothing else is selected
pub const DEFAULT_TEMPLATE: &str = "default";

pub const CHIFRA: &str = "github.com/TrueBlocks/trueblocks-core/src/apps/chifra";
pub const SDK: &str = "github.com/TrueBlocks/trueblocks-sdk/v5";
pub const DALLE: &str = "github.com/TrueBlocks/trueblocks-dalle/v2";

/// Prefix of the generated project's own Go module paths
pub const MODULE_PREFIX: &str = "github.com/TrueBlocks/";

pub const DEFAULT_PUBLISHER_NAME: &str = "YourCompany";
pub const DEFAULT_PUBLISHER_EMAIL: &str = "your_email@your_company.com";

/// Phrases from the generated code base that must survive reverse substitution
/// even when a project or organization value occurs inside them.
pub const PROTECTED_PHRASES: [&str; 40] = [
    "Block explorer",
    "Block Explorer",
    "class Explorer",
    "dalleDressStore",
    "Explorers",
    "explorers: Explorer[];",
    "ExportApprovals",
    "ExportsOpenApprovals",
    "getOpenapprovalsFields",
    "getOpenApprovalsStore",
    "json:\"dalledress\"",
    "local block explorer",
    "Local Explorer",
    "localExplorer",
    "LocalExplorer",
    "new Explorer",
    "Open Approvals",
    "openapprovals",
    "OpenApprovals",
    "OPENAPPROVALS",
    "openapprovalsFacet",
    "openapprovalsStore",
    "openapprovalsStoreMu",
    "pageData?.dalledress",
    "pageData.dalledress",
    "remote block explorer",
    "Remote Explorer",
    "remoteExplorer",
    "RemoteExplorer",
    "SortOpenApprovals",
    "this.explorers = this.convertValues(source[\"explorers\"], Explorer",
    "TokensApprovals",
    "dalledressStore",
    "dalledressStoreMu",
    "dresses-dalledress",
    "\"dalledress\":",
    "getDalledressFields",
    "Store:         \"dalledress\"",
    "this.dalledress = this.convertValues(source[\"dalledress\"], model.DalleDress);",
    "dalledress: model.DalleDress[];",
];
