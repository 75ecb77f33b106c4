use phf::phf_set;

/// Providers of throwaway mailboxes shipped with the crate. Operators can
/// extend or replace this set with a file at startup.
pub(crate) const DISPOSABLE_DOMAINS: phf::Set<&'static str> = phf_set! {
    "0-mail.com",
    "10minutemail.com",
    "10minutemail.net",
    "10minutemail.co.uk",
    "20minutemail.com",
    "33mail.com",
    "anonbox.net",
    "anonymbox.com",
    "armyspy.com",
    "binkmail.com",
    "bobmail.info",
    "burnermail.io",
    "chacuo.net",
    "cuvox.de",
    "dayrep.com",
    "deadaddress.com",
    "discard.email",
    "discardmail.com",
    "dispostable.com",
    "dodgit.com",
    "drdrb.com",
    "dropmail.me",
    "einrot.com",
    "emailondeck.com",
    "emailtemporanea.com",
    "fakeinbox.com",
    "fakemail.net",
    "fleckens.hu",
    "getairmail.com",
    "getnada.com",
    "gishpuppy.com",
    "grr.la",
    "guerrillamail.biz",
    "guerrillamail.com",
    "guerrillamail.de",
    "guerrillamail.info",
    "guerrillamail.net",
    "guerrillamail.org",
    "guerrillamailblock.com",
    "gustr.com",
    "harakirimail.com",
    "incognitomail.org",
    "inboxbear.com",
    "jetable.org",
    "jourrapide.com",
    "kasmail.com",
    "mail-temp.com",
    "mailcatch.com",
    "maildrop.cc",
    "mailexpire.com",
    "mailforspam.com",
    "mailinator.com",
    "mailinator.net",
    "mailinator2.com",
    "mailmetrash.com",
    "mailnesia.com",
    "mailnull.com",
    "mailsac.com",
    "mailtemp.info",
    "meltmail.com",
    "mintemail.com",
    "mohmal.com",
    "moakt.com",
    "mt2015.com",
    "mytemp.email",
    "mytrashmail.com",
    "nada.email",
    "no-spam.ws",
    "nowmymail.com",
    "owlymail.com",
    "pokemail.net",
    "rhyta.com",
    "sharklasers.com",
    "shieldemail.com",
    "spam4.me",
    "spambog.com",
    "spambox.us",
    "spamgourmet.com",
    "spamex.com",
    "spamfree24.org",
    "spamherelots.com",
    "spamhole.com",
    "superrito.com",
    "teleworm.us",
    "temp-mail.io",
    "temp-mail.org",
    "tempail.com",
    "tempinbox.com",
    "tempmail.com",
    "tempmail.net",
    "tempmailaddress.com",
    "tempmailo.com",
    "tempr.email",
    "thankyou2010.com",
    "throwam.com",
    "throwawaymail.com",
    "tmail.ws",
    "tmpmail.net",
    "tmpmail.org",
    "trash-mail.com",
    "trashmail.com",
    "trashmail.de",
    "trashmail.me",
    "trashmail.net",
    "trbvm.com",
    "wegwerfmail.de",
    "wegwerfmail.net",
    "yopmail.com",
    "yopmail.fr",
    "yopmail.net",
    "zetmail.com",
};
