use apns_push::*;

use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};

#[tokio::main]
async fn main() {
    let mut team_id = String::new();
    let mut key_id = String::new();
    let mut key_file = String::new();
    let mut device_token = String::new();
    let mut topic: Option<String> = None;
    let mut alert: Option<String> = None;
    let mut sandbox = false;

    {
        let mut ap = ArgumentParser::new();
        ap.set_description("An APNs push sender");

        ap.refer(&mut team_id)
            .add_option(&["-T", "--team_id"], Store, "Apple developer team id")
            .required();

        ap.refer(&mut key_id)
            .add_option(
                &["-k", "--key_id"],
                Store,
                "Id of the auth key from the developer portal",
            )
            .required();

        ap.refer(&mut key_file)
            .add_option(&["-f", "--key_file"], Store, "Path to the .p8 auth key")
            .required();

        ap.refer(&mut device_token)
            .add_option(
                &["-d", "--device_token"],
                Store,
                "Device token registered with APNs",
            )
            .required();

        ap.refer(&mut topic).add_option(
            &["-t", "--topic"],
            StoreOption,
            "Target topic, usually the app bundle id",
        );

        ap.refer(&mut alert)
            .add_option(&["-p", "--push_payload"], StoreOption, "Alert text");

        ap.refer(&mut sandbox).add_option(
            &["-s", "--sandbox"],
            StoreTrue,
            "Use the development environment",
        );

        ap.parse_args_or_exit();
    }

    let mut builder = ApnsProvider::builder(team_id, key_id);
    builder.set_auth_key_file(key_file);

    if sandbox {
        builder.set_endpoint(Endpoint::Sandbox);
    }

    let provider = builder.build().unwrap();

    let mut notification = Notification::builder();

    if let Some(ref alert) = alert {
        notification.set_alert(alert.as_str());
    }

    let options = SendOptions {
        topic,
        ..SendOptions::default()
    };

    let response = provider
        .send_message(&device_token, &notification.build(), options)
        .await;

    println!("Sent: {:?}", response);
}
