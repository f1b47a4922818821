//! UI translations
//!
//! Pure static tables. The resolved table is carried in the controller's
//! context rather than looked up from a global.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    De,
    Es,
    It,
}

impl Language {
    pub const ALL: [Language; 5] = [Language::Fr, Language::En, Language::De, Language::Es, Language::It];

    /// Map a locale tag (`de-CH`, `en_US.UTF-8`, ...) to a supported
    /// language, falling back to French.
    pub fn detect(locale: &str) -> Self {
        let locale = locale.trim().to_ascii_lowercase();
        if locale.starts_with("de") {
            Language::De
        } else if locale.starts_with("en") {
            Language::En
        } else if locale.starts_with("es") {
            Language::Es
        } else if locale.starts_with("it") {
            Language::It
        } else {
            Language::Fr
        }
    }

    /// Detect from the process environment (`LC_ALL`, then `LANG`)
    pub fn from_env() -> Self {
        let locale = std::env::var("LC_ALL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| std::env::var("LANG").ok())
            .unwrap_or_default();
        Self::detect(&locale)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::De => "de",
            Language::Es => "es",
            Language::It => "it",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::Fr => &FR,
            Language::En => &EN,
            Language::De => &DE,
            Language::Es => &ES,
            Language::It => &IT,
        }
    }
}

#[derive(Debug)]
pub struct Strings {
    pub language_name: &'static str,

    // Screens
    pub title: &'static str,
    pub teaser_text: &'static str,
    pub welcome: &'static str,
    pub welcome_text: &'static str,
    pub enter_site: &'static str,
    pub landing_title: &'static str,
    pub landing_subtitle: &'static str,
    pub join_now: &'static str,
    pub visit_site: &'static str,
    pub back_to_site: &'static str,

    // Auth form
    pub login: &'static str,
    pub signup: &'static str,
    pub email_hint: &'static str,
    pub password_hint: &'static str,
    pub switch_to_signup: &'static str,
    pub switch_to_login: &'static str,
    pub logout: &'static str,
    pub logged_in_as: &'static str,

    // Gallery
    pub videos_heading: &'static str,
    pub no_videos: &'static str,
    pub play: &'static str,
    pub download: &'static str,
    pub subscription_required: &'static str,
    pub unlock_notice: &'static str,
    pub pay_button: &'static str,
    pub subscribed_badge: &'static str,
    pub locked_badge: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub page: &'static str,

    // Status messages
    pub videos_load_failed: &'static str,
    pub login_success: &'static str,
    pub signup_success: &'static str,
    pub credentials_failed: &'static str,
    pub fill_all_fields: &'static str,
    pub login_required: &'static str,
    pub payment_failed: &'static str,
    pub payment_redirect: &'static str,
    pub download_error: &'static str,
    pub download_done: &'static str,
    pub logged_out: &'static str,
    pub session_expired: &'static str,

    // Payment return
    pub verifying_payment: &'static str,
    pub payment_confirmed: &'static str,
    pub payment_confirm_failed: &'static str,
    pub payment_missing_params: &'static str,
    pub subscription_activated: &'static str,
}

impl Strings {
    pub fn for_language(language: Language) -> &'static Strings {
        language.strings()
    }
}

pub static FR: Strings = Strings {
    language_name: "Français",
    title: "Vidéos Premium",
    teaser_text: "Espace exclusif pour adultes. Connecte-toi ou inscris-toi.",
    welcome: "Bienvenue sur StreamX Video",
    welcome_text: "Découvrez un univers exclusif. Abonnez-vous pour accéder à tous les contenus privés.",
    enter_site: "Entrer sur le site",
    landing_title: "StreamX Video",
    landing_subtitle: "Des vidéos exclusives, disponibles dès maintenant.",
    join_now: "Rejoindre maintenant",
    visit_site: "Visiter le site",
    back_to_site: "Retour au site",
    login: "Se connecter",
    signup: "S'inscrire",
    email_hint: "Email",
    password_hint: "Mot de passe",
    switch_to_signup: "Pas encore inscrit ? Créez un compte",
    switch_to_login: "Déjà inscrit ? Connectez-vous",
    logout: "Se déconnecter",
    logged_in_as: "Connecté :",
    videos_heading: "🎥 Vidéos Disponibles",
    no_videos: "Aucune vidéo disponible.",
    play: "▶ Lire",
    download: "📥 Télécharger",
    subscription_required: "🔒 Abonnement requis",
    unlock_notice: "Clique pour débloquer le contenu complet",
    pay_button: "🔐 Débloquer toutes les vidéos – 2€",
    subscribed_badge: "Abonné",
    locked_badge: "Non abonné",
    previous: "◀ Précédent",
    next: "Suivant ▶",
    page: "Page",
    videos_load_failed: "Erreur lors du chargement des vidéos.",
    login_success: "✅ Connexion réussie !",
    signup_success: "✅ Inscription réussie !",
    credentials_failed: "Email ou mot de passe incorrect.",
    fill_all_fields: "Veuillez remplir tous les champs.",
    login_required: "Connectez-vous pour vous abonner.",
    payment_failed: "❌ Paiement échoué.",
    payment_redirect: "Redirection vers le paiement...",
    download_error: "❌ Erreur de téléchargement",
    download_done: "✅ Téléchargement terminé",
    logged_out: "Vous êtes déconnecté.",
    session_expired: "Session expirée, veuillez vous reconnecter.",
    verifying_payment: "⏳ Vérification du paiement...",
    payment_confirmed: "✅ Paiement confirmé ! Redirection...",
    payment_confirm_failed: "❌ Erreur lors de la confirmation du paiement.",
    payment_missing_params: "❌ Lien de confirmation incomplet.",
    subscription_activated: "Abonnement activé",
};

pub static EN: Strings = Strings {
    language_name: "English",
    title: "Premium Videos",
    teaser_text: "Exclusive adult space. Log in or sign up.",
    welcome: "Welcome to StreamX Video",
    welcome_text: "Discover an exclusive world. Subscribe to access all private content.",
    enter_site: "Enter the site",
    landing_title: "StreamX Video",
    landing_subtitle: "Exclusive videos, available right now.",
    join_now: "Join now",
    visit_site: "Visit the site",
    back_to_site: "Back to the site",
    login: "Login",
    signup: "Sign up",
    email_hint: "Email",
    password_hint: "Password",
    switch_to_signup: "No account yet? Create one",
    switch_to_login: "Already registered? Log in",
    logout: "Log out",
    logged_in_as: "Logged in:",
    videos_heading: "🎥 Available Videos",
    no_videos: "No videos available.",
    play: "▶ Play",
    download: "📥 Download",
    subscription_required: "🔒 Subscription required",
    unlock_notice: "Click to unlock full content",
    pay_button: "🔐 Unlock all videos – €2",
    subscribed_badge: "Subscribed",
    locked_badge: "Not subscribed",
    previous: "◀ Previous",
    next: "Next ▶",
    page: "Page",
    videos_load_failed: "Failed to load videos.",
    login_success: "✅ Logged in successfully!",
    signup_success: "✅ Signed up successfully!",
    credentials_failed: "Incorrect email or password.",
    fill_all_fields: "Please fill in all fields.",
    login_required: "Log in to subscribe.",
    payment_failed: "❌ Payment failed.",
    payment_redirect: "Redirecting to payment...",
    download_error: "❌ Download error",
    download_done: "✅ Download complete",
    logged_out: "You are logged out.",
    session_expired: "Session expired, please log in again.",
    verifying_payment: "⏳ Verifying payment...",
    payment_confirmed: "✅ Payment confirmed! Redirecting...",
    payment_confirm_failed: "❌ Error while confirming the payment.",
    payment_missing_params: "❌ Incomplete confirmation link.",
    subscription_activated: "Subscription activated",
};

pub static DE: Strings = Strings {
    language_name: "Deutsch",
    title: "Premium-Videos",
    teaser_text: "Exklusiver Bereich für Erwachsene. Anmelden oder registrieren.",
    welcome: "Willkommen bei StreamX Video",
    welcome_text: "Entdecke eine exklusive Welt. Abonniere, um alle privaten Inhalte zu sehen.",
    enter_site: "Seite betreten",
    landing_title: "StreamX Video",
    landing_subtitle: "Exklusive Videos, ab sofort verfügbar.",
    join_now: "Jetzt beitreten",
    visit_site: "Seite besuchen",
    back_to_site: "Zurück zur Seite",
    login: "Einloggen",
    signup: "Registrieren",
    email_hint: "E-Mail",
    password_hint: "Passwort",
    switch_to_signup: "Noch kein Konto? Jetzt registrieren",
    switch_to_login: "Schon registriert? Einloggen",
    logout: "Abmelden",
    logged_in_as: "Angemeldet:",
    videos_heading: "🎥 Verfügbare Videos",
    no_videos: "Keine Videos verfügbar.",
    play: "▶ Abspielen",
    download: "📥 Herunterladen",
    subscription_required: "🔒 Abo erforderlich",
    unlock_notice: "Klicken, um den vollständigen Inhalt freizuschalten",
    pay_button: "🔐 Alle Videos freischalten – 2€",
    subscribed_badge: "Abonniert",
    locked_badge: "Kein Abo",
    previous: "◀ Zurück",
    next: "Weiter ▶",
    page: "Seite",
    videos_load_failed: "Fehler beim Laden der Videos.",
    login_success: "✅ Anmeldung erfolgreich!",
    signup_success: "✅ Registrierung erfolgreich!",
    credentials_failed: "E-Mail oder Passwort falsch.",
    fill_all_fields: "Bitte alle Felder ausfüllen.",
    login_required: "Zum Abonnieren bitte einloggen.",
    payment_failed: "❌ Zahlung fehlgeschlagen.",
    payment_redirect: "Weiterleitung zur Zahlung...",
    download_error: "❌ Download-Fehler",
    download_done: "✅ Download abgeschlossen",
    logged_out: "Du bist abgemeldet.",
    session_expired: "Sitzung abgelaufen, bitte erneut anmelden.",
    verifying_payment: "⏳ Zahlung wird geprüft...",
    payment_confirmed: "✅ Zahlung bestätigt! Weiterleitung...",
    payment_confirm_failed: "❌ Fehler bei der Zahlungsbestätigung.",
    payment_missing_params: "❌ Unvollständiger Bestätigungslink.",
    subscription_activated: "Abo aktiviert",
};

pub static ES: Strings = Strings {
    language_name: "Español",
    title: "Videos Premium",
    teaser_text: "Espacio exclusivo para adultos. Inicia sesión o regístrate.",
    welcome: "Bienvenido a StreamX Video",
    welcome_text: "Descubre un universo exclusivo. Suscríbete para acceder a todo el contenido privado.",
    enter_site: "Entrar al sitio",
    landing_title: "StreamX Video",
    landing_subtitle: "Videos exclusivos, disponibles ahora.",
    join_now: "Únete ahora",
    visit_site: "Visitar el sitio",
    back_to_site: "Volver al sitio",
    login: "Iniciar sesión",
    signup: "Registrarse",
    email_hint: "Correo",
    password_hint: "Contraseña",
    switch_to_signup: "¿Aún no tienes cuenta? Crea una",
    switch_to_login: "¿Ya registrado? Inicia sesión",
    logout: "Cerrar sesión",
    logged_in_as: "Conectado:",
    videos_heading: "🎥 Videos Disponibles",
    no_videos: "No hay videos disponibles.",
    play: "▶ Reproducir",
    download: "📥 Descargar",
    subscription_required: "🔒 Suscripción requerida",
    unlock_notice: "Haz clic para desbloquear el contenido completo",
    pay_button: "🔐 Desbloquear todos los videos – 2€",
    subscribed_badge: "Suscrito",
    locked_badge: "Sin suscripción",
    previous: "◀ Anterior",
    next: "Siguiente ▶",
    page: "Página",
    videos_load_failed: "Error al cargar los videos.",
    login_success: "✅ ¡Sesión iniciada!",
    signup_success: "✅ ¡Registro completado!",
    credentials_failed: "Correo o contraseña incorrectos.",
    fill_all_fields: "Por favor, completa todos los campos.",
    login_required: "Inicia sesión para suscribirte.",
    payment_failed: "❌ El pago ha fallado.",
    payment_redirect: "Redirigiendo al pago...",
    download_error: "❌ Error de descarga",
    download_done: "✅ Descarga completada",
    logged_out: "Has cerrado sesión.",
    session_expired: "Sesión caducada, vuelve a iniciar sesión.",
    verifying_payment: "⏳ Verificando el pago...",
    payment_confirmed: "✅ ¡Pago confirmado! Redirigiendo...",
    payment_confirm_failed: "❌ Error al confirmar el pago.",
    payment_missing_params: "❌ Enlace de confirmación incompleto.",
    subscription_activated: "Suscripción activada",
};

pub static IT: Strings = Strings {
    language_name: "Italiano",
    title: "Video Premium",
    teaser_text: "Spazio esclusivo per adulti. Accedi o registrati.",
    welcome: "Benvenuto su StreamX Video",
    welcome_text: "Scopri un universo esclusivo. Abbonati per accedere a tutti i contenuti privati.",
    enter_site: "Entra nel sito",
    landing_title: "StreamX Video",
    landing_subtitle: "Video esclusivi, disponibili subito.",
    join_now: "Unisciti ora",
    visit_site: "Visita il sito",
    back_to_site: "Torna al sito",
    login: "Accedi",
    signup: "Registrati",
    email_hint: "Email",
    password_hint: "Password",
    switch_to_signup: "Non hai un account? Creane uno",
    switch_to_login: "Già registrato? Accedi",
    logout: "Esci",
    logged_in_as: "Connesso:",
    videos_heading: "🎥 Video Disponibili",
    no_videos: "Nessun video disponibile.",
    play: "▶ Riproduci",
    download: "📥 Scarica",
    subscription_required: "🔒 Abbonamento richiesto",
    unlock_notice: "Clicca per sbloccare il contenuto completo",
    pay_button: "🔐 Sblocca tutti i video – 2€",
    subscribed_badge: "Abbonato",
    locked_badge: "Non abbonato",
    previous: "◀ Precedente",
    next: "Successivo ▶",
    page: "Pagina",
    videos_load_failed: "Errore durante il caricamento dei video.",
    login_success: "✅ Accesso riuscito!",
    signup_success: "✅ Registrazione riuscita!",
    credentials_failed: "Email o password errati.",
    fill_all_fields: "Compila tutti i campi.",
    login_required: "Accedi per abbonarti.",
    payment_failed: "❌ Pagamento non riuscito.",
    payment_redirect: "Reindirizzamento al pagamento...",
    download_error: "❌ Errore di download",
    download_done: "✅ Download completato",
    logged_out: "Sei disconnesso.",
    session_expired: "Sessione scaduta, accedi di nuovo.",
    verifying_payment: "⏳ Verifica del pagamento...",
    payment_confirmed: "✅ Pagamento confermato! Reindirizzamento...",
    payment_confirm_failed: "❌ Errore durante la conferma del pagamento.",
    payment_missing_params: "❌ Link di conferma incompleto.",
    subscription_activated: "Abbonamento attivato",
};
