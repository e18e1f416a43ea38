use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_types::region::Region;

/// Build a CloudFormation client scoped to the requested region and profile.
///
/// An explicit region wins over the environment/profile chain. Credential
/// caching, including assumed-role credentials, is owned by the SDK's
/// provider chain and is opaque to this tool.
pub async fn client(
    region: Option<&str>,
    profile: Option<&str>,
) -> aws_sdk_cloudformation::Client {
    let region_provider =
        RegionProviderChain::first_try(region.map(|name| Region::new(name.to_string())))
            .or_default_provider();

    let mut loader = aws_config::from_env().region(region_provider);
    if let Some(profile) = profile {
        loader = loader.credentials_provider(
            ProfileFileCredentialsProvider::builder()
                .profile_name(profile)
                .build(),
        );
    }

    let sdk_config = loader.load().await;
    return aws_sdk_cloudformation::Client::new(&sdk_config);
}
