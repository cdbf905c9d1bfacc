use std::collections::HashSet;

use crate::action::{ActionKind, OptOutAction};
use crate::error::{OptOutError, Result};
use crate::platform::Platform;

const UNIX: &[Platform] = &[Platform::Macos, Platform::Linux];
const WINDOWS: &[Platform] = &[Platform::Windows];

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

/// Every opt-out this tool knows about, in log order.
///
/// Several tools share one variable (`CHECKPOINT_DISABLE`), so the same name
/// appears more than once on purpose.
pub const BUILTIN: &[OptOutAction] = &[
    // Environment variables
    OptOutAction::env("do-not-track", "DO_NOT_TRACK", "1").about(
        "Console Do Not Track convention honoured by many CLIs",
        "https://consoledonottrack.com/",
    ),
    OptOutAction::env("dotnet-cli", "DOTNET_CLI_TELEMETRY_OPTOUT", "1").about(
        ".NET SDK command-line telemetry",
        "https://learn.microsoft.com/dotnet/core/tools/telemetry",
    ),
    OptOutAction::env(
        "dotnet-interactive",
        "DOTNET_INTERACTIVE_CLI_TELEMETRY_OPTOUT",
        "1",
    )
    .about(
        ".NET Interactive telemetry",
        "https://github.com/dotnet/interactive/blob/main/docs/FAQ.md",
    ),
    OptOutAction::env("dotnet-svcutil", "DOTNET_SVCUTIL_TELEMETRY_OPTOUT", "1").about(
        "dotnet-svcutil telemetry",
        "https://learn.microsoft.com/dotnet/core/additional-tools/dotnet-svcutil-guide",
    ),
    OptOutAction::env("powershell", "POWERSHELL_TELEMETRY_OPTOUT", "1").about(
        "PowerShell 7 startup telemetry",
        "https://learn.microsoft.com/powershell/module/microsoft.powershell.core/about/about_telemetry",
    ),
    OptOutAction::env("azure-cli-env", "AZURE_CORE_COLLECT_TELEMETRY", "false").about(
        "Azure CLI usage data",
        "https://learn.microsoft.com/cli/azure/azure-cli-configuration",
    ),
    OptOutAction::env(
        "azure-functions",
        "FUNCTIONS_CORE_TOOLS_TELEMETRY_OPTOUT",
        "1",
    )
    .about(
        "Azure Functions Core Tools telemetry",
        "https://learn.microsoft.com/azure/azure-functions/functions-run-local",
    ),
    OptOutAction::env("mssql-cli", "MSSQL_CLI_TELEMETRY_OPTOUT", "True").about(
        "mssql-cli usage telemetry",
        "https://github.com/dbcli/mssql-cli/blob/main/doc/telemetry_guide.md",
    ),
    OptOutAction::env("sam-cli", "SAM_CLI_TELEMETRY", "0").about(
        "AWS SAM CLI telemetry",
        "https://docs.aws.amazon.com/serverless-application-model/latest/developerguide/serverless-sam-telemetry.html",
    ),
    OptOutAction::env("nextjs-env", "NEXT_TELEMETRY_DISABLED", "1").about(
        "Next.js anonymous telemetry",
        "https://nextjs.org/telemetry",
    ),
    OptOutAction::env("gatsby-env", "GATSBY_TELEMETRY_DISABLED", "1").about(
        "Gatsby anonymous telemetry",
        "https://www.gatsbyjs.com/docs/telemetry/",
    ),
    OptOutAction::env("nuxt-env", "NUXT_TELEMETRY_DISABLED", "1").about(
        "Nuxt anonymous telemetry",
        "https://github.com/nuxt/telemetry",
    ),
    OptOutAction::env("angular-env", "NG_CLI_ANALYTICS", "false").about(
        "Angular CLI usage analytics",
        "https://angular.dev/cli/analytics",
    ),
    OptOutAction::env("astro-env", "ASTRO_TELEMETRY_DISABLED", "1").about(
        "Astro anonymous telemetry",
        "https://astro.build/telemetry/",
    ),
    OptOutAction::env("storybook", "STORYBOOK_DISABLE_TELEMETRY", "1").about(
        "Storybook telemetry",
        "https://storybook.js.org/docs/configure/telemetry",
    ),
    OptOutAction::env_presence("terraform", "CHECKPOINT_DISABLE").about(
        "Terraform upgrade and security bulletin checks",
        "https://developer.hashicorp.com/terraform/cli/commands#upgrade-and-security-bulletin-checks",
    ),
    OptOutAction::env_presence("packer", "CHECKPOINT_DISABLE").about(
        "Packer upgrade and security bulletin checks",
        "https://developer.hashicorp.com/packer/docs/configure#full-list-of-environment-variables-usable-for-packer",
    ),
    OptOutAction::env_presence("prisma", "CHECKPOINT_DISABLE").about(
        "Prisma CLI usage data",
        "https://www.prisma.io/docs/orm/tools/prisma-cli#how-to-opt-out-of-data-collection",
    ),
    OptOutAction::env_presence("vcpkg", "VCPKG_DISABLE_METRICS").about(
        "vcpkg usage metrics",
        "https://learn.microsoft.com/vcpkg/about/privacy",
    ),
    OptOutAction::env("homebrew-env", "HOMEBREW_NO_ANALYTICS", "1")
        .on(UNIX)
        .about(
            "Homebrew anonymous analytics",
            "https://docs.brew.sh/Analytics",
        ),
    OptOutAction::env("stripe-cli", "STRIPE_CLI_TELEMETRY_OPTOUT", "1").about(
        "Stripe CLI telemetry",
        "https://docs.stripe.com/stripe-cli/telemetry",
    ),
    OptOutAction::env("hasura", "HASURA_GRAPHQL_ENABLE_TELEMETRY", "false").about(
        "Hasura GraphQL engine and CLI telemetry",
        "https://hasura.io/docs/latest/policies/telemetry/",
    ),
    OptOutAction::env("arduino-cli", "ARDUINO_METRICS_ENABLED", "false").about(
        "Arduino CLI metrics",
        "https://arduino.github.io/arduino-cli/latest/configuration/",
    ),
    OptOutAction::env("quarkus", "QUARKUS_ANALYTICS_DISABLED", "true").about(
        "Quarkus build analytics",
        "https://quarkus.io/usage/",
    ),
    OptOutAction::env("earthly", "EARTHLY_DISABLE_ANALYTICS", "1").about(
        "Earthly anonymous analytics",
        "https://docs.earthly.dev/docs/reference/earthly-config",
    ),
    OptOutAction::env("salesforce-cli", "SF_DISABLE_TELEMETRY", "true").about(
        "Salesforce CLI usage data",
        "https://developer.salesforce.com/docs/atlas.en-us.sfdx_setup.meta/sfdx_setup/sfdx_dev_cli_telemetry.htm",
    ),
    OptOutAction::env("automatedlab", "AUTOMATEDLAB_TELEMETRY_OPTOUT", "1")
        .on(WINDOWS)
        .about(
            "AutomatedLab telemetry",
            "https://automatedlab.org/en/latest/Wiki/About/telemetry/",
        ),
    // Commands
    OptOutAction::command(
        "gcloud",
        "gcloud",
        &["config", "set", "disable_usage_reporting", "true"],
    )
    .about(
        "Google Cloud CLI usage statistics",
        "https://cloud.google.com/sdk/docs/usage-statistics",
    ),
    OptOutAction::command(
        "azure-cli",
        "az",
        &["config", "set", "core.collect_telemetry=false"],
    )
    .about(
        "Azure CLI usage data",
        "https://learn.microsoft.com/cli/azure/azure-cli-configuration",
    ),
    OptOutAction::command("homebrew", "brew", &["analytics", "off"])
        .on(UNIX)
        .about(
            "Homebrew anonymous analytics",
            "https://docs.brew.sh/Analytics",
        ),
    OptOutAction::command("flutter", "flutter", &["--disable-analytics"]).about(
        "Flutter tool analytics",
        "https://docs.flutter.dev/reference/crash-reporting",
    ),
    OptOutAction::command("dart", "dart", &["--disable-analytics"]).about(
        "Dart tool analytics",
        "https://dart.dev/tools/dart-tool",
    ),
    OptOutAction::command(
        "yarn",
        "yarn",
        &["config", "set", "--home", "enableTelemetry", "0"],
    )
    .about(
        "Yarn Berry telemetry",
        "https://yarnpkg.com/advanced/telemetry",
    ),
    OptOutAction::command("nextjs", "next", &["telemetry", "disable"]).about(
        "Next.js anonymous telemetry",
        "https://nextjs.org/telemetry",
    ),
    OptOutAction::command("gatsby", "gatsby", &["telemetry", "--disable"]).about(
        "Gatsby anonymous telemetry",
        "https://www.gatsbyjs.com/docs/telemetry/",
    ),
    OptOutAction::command("nuxt", "nuxi", &["telemetry", "disable", "--global"]).about(
        "Nuxt anonymous telemetry",
        "https://github.com/nuxt/telemetry",
    ),
    OptOutAction::command("angular", "ng", &["analytics", "disable", "--global"]).about(
        "Angular CLI usage analytics",
        "https://angular.dev/cli/analytics",
    ),
    OptOutAction::command("astro", "astro", &["telemetry", "disable"]).about(
        "Astro anonymous telemetry",
        "https://astro.build/telemetry/",
    ),
    OptOutAction::command("netlify", "netlify", &["--telemetry-disable"]).about(
        "Netlify CLI telemetry",
        "https://docs.netlify.com/cli/get-started/#usage-data-collection",
    ),
    OptOutAction::command("vercel", "vercel", &["telemetry", "disable"]).about(
        "Vercel CLI telemetry",
        "https://vercel.com/docs/cli/about-telemetry",
    ),
    OptOutAction::command("cordova", "cordova", &["telemetry", "off"]).about(
        "Apache Cordova CLI telemetry",
        "https://cordova.apache.org/docs/en/latest/guide/cli/#telemetry",
    ),
    OptOutAction::command("ionic", "ionic", &["config", "set", "-g", "telemetry", "false"])
        .about(
            "Ionic CLI telemetry",
            "https://ionicframework.com/docs/cli/configuration#telemetry",
        ),
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Validated, ordered, read-only list of opt-out actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    actions: Vec<OptOutAction>,
}

impl Catalog {
    /// Validate and wrap a list of actions.
    ///
    /// Rejects empty ids, names and executables, and duplicate ids.
    /// Duplicate environment-variable names are allowed.
    pub fn new(actions: Vec<OptOutAction>) -> Result<Self> {
        let mut seen = HashSet::new();
        for action in &actions {
            if action.id.is_empty() {
                return Err(OptOutError::InvalidConfiguration(
                    "action id must not be empty".to_string(),
                ));
            }
            match action.kind {
                ActionKind::EnvVar { name, .. } if name.is_empty() => {
                    return Err(OptOutError::InvalidConfiguration(format!(
                        "{}: environment variable name must not be empty",
                        action.id
                    )));
                }
                ActionKind::Command { executable, .. } if executable.is_empty() => {
                    return Err(OptOutError::InvalidConfiguration(format!(
                        "{}: executable must not be empty",
                        action.id
                    )));
                }
                _ => {}
            }
            if !seen.insert(action.id) {
                return Err(OptOutError::InvalidConfiguration(format!(
                    "duplicate action id '{}'",
                    action.id
                )));
            }
        }
        Ok(Self { actions })
    }

    /// The compiled-in catalog.
    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN.to_vec())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptOutAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&OptOutAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Actions whose platform filter admits `platform`, in catalog order.
    pub fn for_platform(&self, platform: Platform) -> impl Iterator<Item = &OptOutAction> {
        self.actions.iter().filter(move |a| a.applies_to(platform))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a OptOutAction;
    type IntoIter = std::slice::Iter<'a, OptOutAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
